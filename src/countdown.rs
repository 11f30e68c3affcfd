use crate::models::{Cycle, CycleId};
use crate::store::CycleStore;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No cycle is active, nothing is scheduled.
    Idle,
    /// A timer is armed but its next tick has not come up yet.
    NotDue,
    /// The cycle this timer belonged to is no longer active; the timer was dropped.
    Cancelled(CycleId),
    Progress(u64),
    Finished(CycleId),
}

/// Whole seconds between `start` and `now`, floored, never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - start).num_seconds().max(0) as u64
}

/// A recurring tick scheduled for one cycle. Dropping it cancels it.
#[derive(Debug)]
pub struct CountdownTimer {
    cycle_id: CycleId,
    interval: Duration,
    last_tick: DateTime<Utc>,
    next_tick: DateTime<Utc>,
}

impl CountdownTimer {
    fn arm(cycle: &Cycle, interval: Duration, now: DateTime<Utc>) -> Self {
        Self {
            cycle_id: cycle.id,
            interval,
            last_tick: now,
            next_tick: now,
        }
    }

    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    // A clock that jumped backwards makes `now` earlier than the last tick;
    // treat that as due so the schedule re-anchors instead of stalling.
    fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_tick || now < self.last_tick
    }

    fn reschedule(&mut self, now: DateTime<Utc>) {
        self.last_tick = now;
        self.next_tick = now + self.interval;
    }
}

/// Turns wall-clock time into published elapsed seconds for the active cycle
/// and finishes the cycle when its time is up.
///
/// The timer slot holds at most one `CountdownTimer`, always for the store's
/// active cycle. It is replaced when a different cycle becomes active and
/// cleared on interruption, completion and `cancel`.
#[derive(Debug)]
pub struct Countdown {
    interval: Duration,
    timer: Option<CountdownTimer>,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timer: None,
        }
    }

    pub fn armed_for(&self) -> Option<CycleId> {
        self.timer.as_ref().map(CountdownTimer::cycle_id)
    }

    /// Aligns the timer slot with the store's active cycle. Called right after
    /// a cycle is created so the first tick runs immediately.
    pub fn sync(&mut self, store: &CycleStore, now: DateTime<Utc>) {
        match (store.active_cycle(), self.armed_for()) {
            (Some(active), Some(armed)) if active.id == armed => {}
            (Some(active), _) => {
                tracing::debug!(cycle_id = %active.id, "countdown armed");
                self.timer = Some(CountdownTimer::arm(active, self.interval, now));
            }
            (None, Some(_)) => self.cancel(),
            (None, None) => {}
        }
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            tracing::debug!(cycle_id = %timer.cycle_id, "countdown cancelled");
        }
    }

    pub fn tick(&mut self, store: &mut CycleStore, now: DateTime<Utc>) -> TickOutcome {
        let Some(timer) = self.timer.as_mut() else {
            return TickOutcome::Idle;
        };
        let timer_cycle = timer.cycle_id;

        let cycle = match store.active_cycle() {
            Some(cycle) if cycle.id == timer_cycle => cycle,
            _ => {
                self.cancel();
                return TickOutcome::Cancelled(timer_cycle);
            }
        };

        if !timer.is_due(now) {
            return TickOutcome::NotDue;
        }
        timer.reschedule(now);

        let total = cycle.total_seconds();
        let elapsed = elapsed_seconds(cycle.start_date, now);

        if elapsed >= total {
            store.set_seconds_passed(total);
            store.complete_active_cycle(now);
            self.timer = None;
            TickOutcome::Finished(timer_cycle)
        } else {
            store.set_seconds_passed(elapsed);
            TickOutcome::Progress(elapsed)
        }
    }
}
