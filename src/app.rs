use crate::config::Config;
use crate::countdown::{Countdown, TickOutcome};
use crate::form::NewCycleForm;
use crate::models::{CycleId, NewCycle};
use crate::store::{CycleStore, StoreError};
use chrono::{DateTime, Duration, Utc};

const MAX_TICK_INTERVAL_MS: u64 = 60_000;

/// Poll interval from config, kept within `1..=60_000` ms.
fn tick_interval(ms: u64) -> Duration {
    Duration::milliseconds(ms.clamp(1, MAX_TICK_INTERVAL_MS) as i64)
}

/// One application session: the cycle store, its countdown and the new-cycle
/// form. Surfaces hold a `&mut Session` and never touch cycle state any other way.
pub struct Session {
    store: CycleStore,
    countdown: Countdown,
    pub form: NewCycleForm,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            store: CycleStore::new(),
            countdown: Countdown::new(tick_interval(config.tick_interval_ms)),
            form: NewCycleForm::new(
                config.default_minutes_amount,
                config.minutes_step,
                config.task_suggestions.clone(),
            ),
        }
    }

    pub fn store(&self) -> &CycleStore {
        &self.store
    }

    pub fn can_submit(&self) -> bool {
        self.store.can_create()
    }

    /// Validates the form and starts a cycle from it. Returns `None` while a
    /// cycle is active or when validation fails (the error stays on the form).
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<CycleId> {
        if !self.can_submit() {
            return None;
        }
        let new_cycle = self.form.submit()?;
        match self.start(new_cycle, now) {
            Ok(id) => {
                self.form.reset();
                Some(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "submit reached the store with a cycle active");
                None
            }
        }
    }

    pub fn start(
        &mut self,
        new_cycle: NewCycle,
        now: DateTime<Utc>,
    ) -> Result<CycleId, StoreError> {
        let id = self.store.create_cycle(new_cycle, now)?.id;
        self.countdown.sync(&self.store, now);
        Ok(id)
    }

    pub fn interrupt(&mut self, now: DateTime<Utc>) -> Option<CycleId> {
        let id = self.store.interrupt_active_cycle(now);
        self.countdown.cancel();
        id
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        self.countdown.tick(&mut self.store, now)
    }

    /// Teardown: an active cycle is interrupted and the timer released.
    pub fn shutdown(&mut self, now: DateTime<Utc>) {
        if let Some(id) = self.interrupt(now) {
            tracing::info!(cycle_id = %id, "session closed with an active cycle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ValidationError;
    use crate::models::CycleStatus;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
    }

    fn session() -> Session {
        Session::new(&Config::default())
    }

    #[test]
    fn test_submit_starts_cycle_and_resets_form() {
        let mut s = session();
        s.form.task = "Write report".to_string();
        s.form.minutes_amount = "1".to_string();

        let id = s.submit(t0()).unwrap();

        let active = s.store().active_cycle().unwrap();
        assert_eq!(active.id, id);
        assert_eq!(active.minutes_amount, 1);
        assert!(s.form.task.is_empty());
        assert!(!s.can_submit());
    }

    #[test]
    fn test_submit_is_disabled_while_active() {
        let mut s = session();
        s.form.task = "first".to_string();
        s.submit(t0()).unwrap();

        s.form.task = "second".to_string();
        assert!(s.submit(t0() + Duration::seconds(1)).is_none());
        assert_eq!(s.store().cycles().len(), 1);
        assert_eq!(s.form.task, "second");
    }

    #[test]
    fn test_invalid_form_never_reaches_store() {
        let mut s = session();
        s.form.task = "x".to_string();
        s.form.minutes_amount = "0".to_string();

        assert!(s.submit(t0()).is_none());
        assert!(s.store().cycles().is_empty());
        assert!(matches!(
            s.form.error,
            Some(ValidationError::MinutesOutOfRange { got: 0, .. })
        ));
    }

    #[test]
    fn test_full_cycle_runs_to_completion() {
        let mut s = session();
        let id = s
            .start(
                NewCycle {
                    task: "focus".to_string(),
                    minutes_amount: 1,
                },
                t0(),
            )
            .unwrap();

        let mut now = t0();
        let mut finished = 0;
        for _ in 0..70 {
            if s.tick(now) == TickOutcome::Finished(id) {
                finished += 1;
            }
            now += Duration::seconds(1);
        }

        assert_eq!(finished, 1);
        assert_eq!(s.store().amount_seconds_passed(), 60);
        assert_eq!(s.store().cycles()[0].status(), CycleStatus::Finished);
        assert_eq!(
            s.store().cycles()[0].finished_date,
            Some(t0() + Duration::seconds(60))
        );
        assert!(s.can_submit());
    }

    #[test]
    fn test_interrupt_releases_timer_immediately() {
        let mut s = session();
        s.form.task = "focus".to_string();
        s.submit(t0()).unwrap();
        s.tick(t0());

        let stop = t0() + Duration::seconds(3);
        assert!(s.interrupt(stop).is_some());
        assert_eq!(s.tick(stop + Duration::seconds(1)), TickOutcome::Idle);
        assert_eq!(s.store().cycles()[0].interrupted_date, Some(stop));
    }

    #[test]
    fn test_tick_interval_is_bounded() {
        assert_eq!(tick_interval(1000), Duration::seconds(1));
        assert_eq!(tick_interval(0), Duration::milliseconds(1));
        assert_eq!(tick_interval(u64::MAX), Duration::seconds(60));
    }

    #[test]
    fn test_huge_tick_interval_still_schedules_forward() {
        let config = Config {
            tick_interval_ms: u64::MAX,
            ..Config::default()
        };
        let mut s = Session::new(&config);
        s.form.task = "focus".to_string();
        s.submit(t0()).unwrap();

        assert_eq!(s.tick(t0()), TickOutcome::Progress(0));
        assert_eq!(s.tick(t0() + Duration::seconds(1)), TickOutcome::NotDue);
        assert_eq!(
            s.tick(t0() + Duration::seconds(60)),
            TickOutcome::Progress(60)
        );
    }

    #[test]
    fn test_shutdown_interrupts_active_cycle() {
        let mut s = session();
        s.form.task = "focus".to_string();
        s.submit(t0()).unwrap();

        s.shutdown(t0() + Duration::seconds(5));
        assert_eq!(s.store().cycles()[0].status(), CycleStatus::Interrupted);

        s.shutdown(t0() + Duration::seconds(6));
        assert_eq!(
            s.store().cycles()[0].interrupted_date,
            Some(t0() + Duration::seconds(5))
        );
    }
}
