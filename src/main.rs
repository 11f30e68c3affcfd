mod app;
mod config;
mod countdown;
mod display;
mod form;
mod headless;
mod logging;
mod models;
mod report;
mod stats;
mod store;
mod tui;
mod utils;

use anyhow::Result;
use app::Session;
use clap::{Parser, Subcommand};
use models::NewCycle;

#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "A Pomodoro timer that tracks your focus cycles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the full-screen timer
    Tui {
        /// Start a cycle on this task right away
        #[arg(short, long)]
        task: Option<String>,
        /// Cycle length (e.g. 25, 25m, 1h)
        #[arg(short, long)]
        minutes: Option<String>,
    },
    /// Run a single cycle in the terminal without the full-screen UI
    Run {
        /// What you are working on
        #[arg(short, long)]
        task: String,
        /// Cycle length (e.g. 25, 25m, 1h)
        #[arg(short, long)]
        minutes: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config()?;
    let base_dir = config::get_base_dir()?;
    let _log_guard = logging::init(&base_dir.join("logs"), &config.log_level)?;

    match cli.command.unwrap_or(Commands::Tui {
        task: None,
        minutes: None,
    }) {
        Commands::Tui { task, minutes } => {
            if let Some(raw) = &minutes {
                config.default_minutes_amount = form::parse_minutes(raw)?;
            }
            let mut session = Session::new(&config);
            let initial = match task {
                Some(task) => {
                    session.form.task = task;
                    Some(session.form.take()?)
                }
                None => None,
            };

            tui::run_tui(&mut session, initial)?;

            print!("{}", report::render(session.store().cycles()));
        }
        Commands::Run { task, minutes } => {
            let mut session = Session::new(&config);
            session.form.task = task;
            if let Some(raw) = minutes {
                session.form.minutes_amount = raw;
            }
            let new_cycle: NewCycle = session.form.take()?;

            let status = headless::run_headless(&mut session, new_cycle)?;
            tracing::info!(status = ?status, "headless cycle ended");

            print!("{}", report::render(session.store().cycles()));
        }
    }

    Ok(())
}
