use crate::models::Cycle;

pub const PLACEHOLDER: &str = "00:00";
pub const APP_TITLE: &str = "Pomo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    pub fn of(cycle: &Cycle, elapsed: u64) -> Self {
        let remaining = cycle.total_seconds().saturating_sub(elapsed);
        Self {
            minutes: remaining / 60,
            seconds: remaining % 60,
        }
    }
}

impl std::fmt::Display for Remaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

pub fn countdown_text(active: Option<&Cycle>, elapsed: u64) -> String {
    match active {
        Some(cycle) => Remaining::of(cycle, elapsed).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn window_title(active: Option<&Cycle>, elapsed: u64) -> String {
    match active {
        Some(cycle) => format!("{} - {}", countdown_text(Some(cycle), elapsed), cycle.task),
        None => APP_TITLE.to_string(),
    }
}

pub fn progress_ratio(active: Option<&Cycle>, elapsed: u64) -> f64 {
    match active {
        Some(cycle) if cycle.total_seconds() > 0 => {
            (elapsed as f64 / cycle.total_seconds() as f64).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}
