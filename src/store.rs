use crate::models::{Cycle, CycleId, NewCycle};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("cycle {0} is still active; interrupt or finish it first")]
    CycleAlreadyActive(CycleId),
}

/// Owns the cycle history and the active-cycle pointer.
///
/// Every mutation goes through this type, so "at most one active cycle" only
/// has to hold here. `revision` moves on every observable change and is what
/// renderers watch to decide whether to redraw.
#[derive(Debug, Default)]
pub struct CycleStore {
    cycles: Vec<Cycle>,
    active_cycle_id: Option<CycleId>,
    amount_seconds_passed: u64,
    revision: u64,
}

impl CycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        let id = self.active_cycle_id?;
        self.cycles.iter().rev().find(|c| c.id == id)
    }

    pub fn can_create(&self) -> bool {
        self.active_cycle_id.is_none()
    }

    pub fn amount_seconds_passed(&self) -> u64 {
        self.amount_seconds_passed
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn create_cycle(
        &mut self,
        new_cycle: NewCycle,
        now: DateTime<Utc>,
    ) -> Result<&Cycle, StoreError> {
        if let Some(id) = self.active_cycle_id {
            return Err(StoreError::CycleAlreadyActive(id));
        }

        let cycle = Cycle::new_at(new_cycle, now);
        tracing::info!(
            cycle_id = %cycle.id,
            task = %cycle.task,
            minutes = cycle.minutes_amount,
            "cycle started"
        );

        self.active_cycle_id = Some(cycle.id);
        self.amount_seconds_passed = 0;
        self.cycles.push(cycle);
        self.bump();

        let idx = self.cycles.len() - 1;
        Ok(&self.cycles[idx])
    }

    pub fn interrupt_active_cycle(&mut self, now: DateTime<Utc>) -> Option<CycleId> {
        let cycle = self.take_active()?;
        cycle.interrupted_date = Some(now);
        let id = cycle.id;
        tracing::info!(cycle_id = %id, "cycle interrupted");
        self.bump();
        Some(id)
    }

    pub fn complete_active_cycle(&mut self, now: DateTime<Utc>) -> Option<CycleId> {
        let cycle = self.take_active()?;
        cycle.finished_date = Some(now);
        let id = cycle.id;
        tracing::info!(cycle_id = %id, "cycle finished");
        self.bump();
        Some(id)
    }

    pub fn set_seconds_passed(&mut self, seconds: u64) {
        if self.amount_seconds_passed != seconds {
            self.amount_seconds_passed = seconds;
            self.bump();
        }
    }

    // Clears the pointer and hands back the cycle it pointed at.
    fn take_active(&mut self) -> Option<&mut Cycle> {
        let id = self.active_cycle_id.take()?;
        let cycle = self.cycles.iter_mut().rev().find(|c| c.id == id);
        if cycle.is_none() {
            tracing::warn!(cycle_id = %id, "active pointer referenced a missing cycle");
        }
        cycle.filter(|c| c.is_active())
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
