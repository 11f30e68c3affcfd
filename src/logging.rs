use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to a daily file under `dir`; the terminal is owned by
/// the UI. Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path, level: &str) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(dir, "pomo.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not initialise logging: {}", e))?;

    Ok(guard)
}
