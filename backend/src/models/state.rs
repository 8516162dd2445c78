//! Ledger State
//!
//! The associative stores behind the accrual ledger: schedules keyed by
//! simulation id, and access records keyed by (simulation id, principal).
//!
//! # Critical Invariants
//!
//! 1. **Schedule Permanence**: schedules are never removed; deactivation is
//!    the only retirement mechanism
//! 2. **Entitlement Uniqueness**: each entitlement id appears on exactly one
//!    schedule
//! 3. **Implicit Access**: a missing access record reads as
//!    "not whitelisted, nothing claimed"

use crate::models::access::AccessRecord;
use crate::models::schedule::Schedule;
use std::collections::HashMap;

/// Complete mutable state of the accrual ledger
///
/// # Example
///
/// ```rust
/// use reward_ledger_core_rs::{LedgerState, Schedule};
///
/// let mut state = LedgerState::new();
/// state.add_schedule(Schedule::new(42, 1, 100, 7));
///
/// assert_eq!(state.num_schedules(), 1);
/// assert!(state.is_registered(42));
/// assert!(!state.is_whitelisted(42, "alice"));
/// ```
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// All registered schedules, indexed by simulation id
    schedules: HashMap<u64, Schedule>,

    /// Access records, indexed by (simulation id, principal)
    ///
    /// Populated lazily: whitelisting or claiming materializes the record;
    /// reads treat an absent record as the default.
    access: HashMap<(u64, String), AccessRecord>,
}

impl LedgerState {
    /// Create an empty ledger state
    pub fn new() -> Self {
        Self {
            schedules: HashMap::new(),
            access: HashMap::new(),
        }
    }

    /// Get reference to a schedule by simulation id
    pub fn get_schedule(&self, simulation_id: u64) -> Option<&Schedule> {
        self.schedules.get(&simulation_id)
    }

    /// Get mutable reference to a schedule by simulation id
    pub fn get_schedule_mut(&mut self, simulation_id: u64) -> Option<&mut Schedule> {
        self.schedules.get_mut(&simulation_id)
    }

    /// Add a newly registered schedule
    ///
    /// # Panics
    ///
    /// Panics if a schedule already exists for the simulation id; the
    /// orchestrator rejects duplicate registration before construction.
    pub fn add_schedule(&mut self, schedule: Schedule) {
        let simulation_id = schedule.simulation_id();
        assert!(
            !self.schedules.contains_key(&simulation_id),
            "Schedule for simulation {} already exists",
            simulation_id
        );
        self.schedules.insert(simulation_id, schedule);
    }

    /// Whether a schedule exists for the simulation id
    pub fn is_registered(&self, simulation_id: u64) -> bool {
        self.schedules.contains_key(&simulation_id)
    }

    /// Get reference to an access record, if it has been materialized
    pub fn get_access(&self, simulation_id: u64, principal: &str) -> Option<&AccessRecord> {
        self.access.get(&(simulation_id, principal.to_string()))
    }

    /// Get mutable reference to an access record, materializing the
    /// implicit default if absent
    pub fn access_mut(&mut self, simulation_id: u64, principal: &str) -> &mut AccessRecord {
        self.access
            .entry((simulation_id, principal.to_string()))
            .or_default()
    }

    /// Whether a principal is whitelisted (false when no record exists)
    pub fn is_whitelisted(&self, simulation_id: u64, principal: &str) -> bool {
        self.get_access(simulation_id, principal)
            .map(AccessRecord::is_whitelisted)
            .unwrap_or(false)
    }

    /// Claimed-day watermark for a principal (0 when no record exists)
    pub fn last_claimed_day(&self, simulation_id: u64, principal: &str) -> u64 {
        self.get_access(simulation_id, principal)
            .map(AccessRecord::last_claimed_day)
            .unwrap_or(0)
    }

    /// Get reference to all schedules
    pub fn schedules(&self) -> &HashMap<u64, Schedule> {
        &self.schedules
    }

    /// Get reference to all materialized access records
    pub fn access_records(&self) -> &HashMap<(u64, String), AccessRecord> {
        &self.access
    }

    /// Get number of registered schedules
    pub fn num_schedules(&self) -> usize {
        self.schedules.len()
    }

    /// Get number of materialized access records
    pub fn num_access_records(&self) -> usize {
        self.access.len()
    }

    /// Get number of schedules currently active
    pub fn num_active_schedules(&self) -> usize {
        self.schedules.values().filter(|s| s.is_active()).count()
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = LedgerState::new();
        assert_eq!(state.num_schedules(), 0);
        assert_eq!(state.num_access_records(), 0);
        assert!(!state.is_registered(1));
    }

    #[test]
    fn test_add_schedule() {
        let mut state = LedgerState::new();
        state.add_schedule(Schedule::new(42, 1, 100, 7));

        assert!(state.is_registered(42));
        let schedule = state.get_schedule(42).unwrap();
        assert_eq!(schedule.entitlement_id(), 1);
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_schedule_panics() {
        let mut state = LedgerState::new();
        state.add_schedule(Schedule::new(42, 1, 100, 7));
        state.add_schedule(Schedule::new(42, 2, 50, 8));
    }

    #[test]
    fn test_absent_access_reads_as_default() {
        let state = LedgerState::new();
        assert!(!state.is_whitelisted(42, "alice"));
        assert_eq!(state.last_claimed_day(42, "alice"), 0);
        assert!(state.get_access(42, "alice").is_none());
    }

    #[test]
    fn test_access_mut_materializes_default_record() {
        let mut state = LedgerState::new();
        state.access_mut(42, "alice").grant_whitelist();

        assert!(state.is_whitelisted(42, "alice"));
        assert_eq!(state.num_access_records(), 1);
        // Whitelisting one principal leaves others at the default.
        assert!(!state.is_whitelisted(42, "bob"));
    }

    #[test]
    fn test_num_active_schedules_tracks_flags() {
        let mut state = LedgerState::new();
        state.add_schedule(Schedule::new(1, 1, 100, 7));
        state.add_schedule(Schedule::new(2, 2, 200, 9));
        assert_eq!(state.num_active_schedules(), 2);

        state.get_schedule_mut(1).unwrap().deactivate();
        assert_eq!(state.num_active_schedules(), 1);
    }
}
