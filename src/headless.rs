use crate::app::Session;
use crate::countdown::TickOutcome;
use crate::display::countdown_text;
use crate::models::{CycleStatus, NewCycle};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

/// Runs a single cycle without the TUI, printing the countdown on one line.
/// Ctrl-C interrupts the cycle instead of killing the process.
pub fn run_headless(session: &mut Session, new_cycle: NewCycle) -> Result<CycleStatus> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    session.start(new_cycle, Utc::now())?;

    let mut stdout = io::stdout();
    let status = drive(session, &interrupted, &mut stdout, Utc::now, || {
        std::thread::sleep(StdDuration::from_millis(200))
    })?;
    writeln!(stdout)?;
    Ok(status)
}

fn drive<W, C, P>(
    session: &mut Session,
    interrupted: &AtomicBool,
    out: &mut W,
    mut clock: C,
    mut pause: P,
) -> Result<CycleStatus>
where
    W: Write,
    C: FnMut() -> DateTime<Utc>,
    P: FnMut(),
{
    loop {
        let now = clock();
        if interrupted.swap(false, Ordering::SeqCst) {
            session.interrupt(now);
        }

        match session.tick(now) {
            TickOutcome::Progress(_) => {
                let store = session.store();
                if let Some(cycle) = store.active_cycle() {
                    write!(
                        out,
                        "\r{}  {}",
                        countdown_text(Some(cycle), store.amount_seconds_passed()),
                        cycle.task
                    )?;
                    out.flush()?;
                }
            }
            TickOutcome::NotDue => {}
            TickOutcome::Finished(_) | TickOutcome::Cancelled(_) | TickOutcome::Idle => {
                let status = session
                    .store()
                    .cycles()
                    .last()
                    .map(|c| c.status())
                    .unwrap_or(CycleStatus::Interrupted);
                write!(out, "\r00:00  {}", status.label())?;
                out.flush()?;
                return Ok(status);
            }
        }

        pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
    }

    fn started(minutes_amount: u32) -> Session {
        let mut session = Session::new(&Config::default());
        session
            .start(
                NewCycle {
                    task: "Write report".to_string(),
                    minutes_amount,
                },
                t0(),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_drive_runs_until_finished() {
        let mut session = started(1);
        let flag = AtomicBool::new(false);
        let mut out = Vec::new();
        let mut now = t0();

        let status = drive(
            &mut session,
            &flag,
            &mut out,
            || {
                let current = now;
                now += Duration::seconds(1);
                current
            },
            || {},
        )
        .unwrap();

        assert_eq!(status, CycleStatus::Finished);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r01:00  Write report"));
        assert!(text.contains("\r00:01  Write report"));
        assert!(text.ends_with("Finished"));
    }

    #[test]
    fn test_drive_stops_on_interrupt_flag() {
        let mut session = started(25);
        let flag = AtomicBool::new(false);
        let mut out = Vec::new();
        let mut now = t0();
        let mut ticks = 0;

        let status = drive(
            &mut session,
            &flag,
            &mut out,
            || {
                let current = now;
                now += Duration::seconds(1);
                current
            },
            || {
                ticks += 1;
                if ticks == 3 {
                    flag.store(true, Ordering::SeqCst);
                }
            },
        )
        .unwrap();

        assert_eq!(status, CycleStatus::Interrupted);
        let cycle = &session.store().cycles()[0];
        assert_eq!(cycle.interrupted_date, Some(t0() + Duration::seconds(3)));
        assert!(!flag.load(Ordering::SeqCst));
    }
}
