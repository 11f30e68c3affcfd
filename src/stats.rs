use crate::models::{Cycle, CycleStatus};
use chrono::Duration;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct HistoryStats {
    pub total: u32,
    pub finished: u32,
    pub interrupted: u32,
    pub active: u32,
    /// Time actually spent on cycles that reached a terminal state.
    pub focused: Duration,
    pub longest_finished: Option<Duration>,
}

/// Wall-clock time the cycle ran for, `None` while it is still active.
pub fn cycle_duration(cycle: &Cycle) -> Option<Duration> {
    let end = cycle.ended_at()?;
    Some((end - cycle.start_date).max(Duration::zero()))
}

pub fn calculate_stats(cycles: &[Cycle]) -> HistoryStats {
    let mut stats = HistoryStats::default();

    for cycle in cycles {
        stats.total += 1;
        match cycle.status() {
            CycleStatus::Active => stats.active += 1,
            CycleStatus::Interrupted => stats.interrupted += 1,
            CycleStatus::Finished => stats.finished += 1,
        }

        if let Some(duration) = cycle_duration(cycle) {
            stats.focused += duration;
            if cycle.status() == CycleStatus::Finished {
                stats.longest_finished =
                    Some(stats.longest_finished.map_or(duration, |m| m.max(duration)));
            }
        }
    }

    stats
}
