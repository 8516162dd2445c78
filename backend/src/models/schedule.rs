//! Accrual schedule model
//!
//! One schedule exists per registered simulation. Everything but the
//! `active` flag is fixed at registration: the daily allotment, the release
//! hour, and the internally assigned entitlement id the token ledger keys
//! balances on.

use serde::{Deserialize, Serialize};

/// Accrual schedule for one registered simulation
///
/// # Example
/// ```
/// use reward_ledger_core_rs::Schedule;
///
/// let schedule = Schedule::new(42, 1, 100, 7);
/// assert_eq!(schedule.entitlement_id(), 1);
/// assert_eq!(schedule.daily_amount(), 100);
/// assert!(schedule.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// External simulation identifier (validated against the session registry)
    simulation_id: u64,

    /// Internal entitlement identifier, assigned sequentially from 1
    ///
    /// The token ledger keys balances on this id. Never reused or
    /// reassigned once issued.
    entitlement_id: u64,

    /// Tokens accrued per elapsed day (immutable, positive)
    daily_amount: u64,

    /// Hour of day [0, 23] at which a day's allotment unlocks (immutable)
    release_hour: u8,

    /// Whether claims and spends are currently allowed
    active: bool,
}

impl Schedule {
    /// Create a schedule as registration does: active, fields fixed
    ///
    /// # Panics
    /// Panics if `entitlement_id` is 0, `daily_amount` is 0, or
    /// `release_hour` exceeds 23. The orchestrator validates these before
    /// construction; the asserts guard direct library use.
    ///
    /// # Example
    /// ```
    /// use reward_ledger_core_rs::Schedule;
    ///
    /// let schedule = Schedule::new(7, 3, 250, 12);
    /// assert_eq!(schedule.simulation_id(), 7);
    /// assert_eq!(schedule.release_hour(), 12);
    /// ```
    pub fn new(simulation_id: u64, entitlement_id: u64, daily_amount: u64, release_hour: u8) -> Self {
        assert!(entitlement_id >= 1, "entitlement ids start at 1");
        assert!(daily_amount > 0, "daily_amount must be positive");
        assert!(release_hour <= 23, "release_hour must be at most 23");
        Self {
            simulation_id,
            entitlement_id,
            daily_amount,
            release_hour,
            active: true,
        }
    }

    /// Reconstruct a schedule from checkpoint data, including its flag
    pub fn from_snapshot(
        simulation_id: u64,
        entitlement_id: u64,
        daily_amount: u64,
        release_hour: u8,
        active: bool,
    ) -> Self {
        let mut schedule = Self::new(simulation_id, entitlement_id, daily_amount, release_hour);
        schedule.active = active;
        schedule
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the external simulation id
    pub fn simulation_id(&self) -> u64 {
        self.simulation_id
    }

    /// Get the internal entitlement id
    pub fn entitlement_id(&self) -> u64 {
        self.entitlement_id
    }

    /// Get the per-day token allotment
    pub fn daily_amount(&self) -> u64 {
        self.daily_amount
    }

    /// Get the release hour [0, 23]
    pub fn release_hour(&self) -> u8 {
        self.release_hour
    }

    /// Whether the schedule is currently active
    pub fn is_active(&self) -> bool {
        self.active
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Allow claims and spends (idempotent)
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Suspend claims and spends (idempotent)
    ///
    /// Accrual keeps counting while inactive; reactivation exposes the
    /// accumulated days again.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
