use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleId(Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Active,
    Interrupted,
    Finished,
}

impl CycleStatus {
    pub fn label(self) -> &'static str {
        match self {
            CycleStatus::Active => "In progress",
            CycleStatus::Interrupted => "Interrupted",
            CycleStatus::Finished => "Finished",
        }
    }
}

/// A validated request to start a cycle. Only `form::NewCycleForm::validate`
/// and tests build one, so the store never sees an empty task or a zero duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCycle {
    pub task: String,
    pub minutes_amount: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Cycle {
    pub id: CycleId,
    pub task: String,
    pub minutes_amount: u32,
    pub start_date: DateTime<Utc>,
    pub interrupted_date: Option<DateTime<Utc>>,
    pub finished_date: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn new_at(new_cycle: NewCycle, at: DateTime<Utc>) -> Self {
        Self {
            id: CycleId::new(),
            task: new_cycle.task,
            minutes_amount: new_cycle.minutes_amount,
            start_date: at,
            interrupted_date: None,
            finished_date: None,
        }
    }

    pub fn status(&self) -> CycleStatus {
        match (self.interrupted_date, self.finished_date) {
            (Some(_), _) => CycleStatus::Interrupted,
            (None, Some(_)) => CycleStatus::Finished,
            (None, None) => CycleStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == CycleStatus::Active
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes_amount) * 60
    }

    /// When the cycle reached its terminal state, if it has.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.interrupted_date.or(self.finished_date)
    }
}
