//! Per-principal access state
//!
//! One record per (simulation, principal) pair. Records come into being
//! implicitly as "not whitelisted, nothing claimed"; whitelisting is
//! set-once-true and the claimed-day watermark only moves forward.

use serde::{Deserialize, Serialize};

/// Access state of one principal under one simulation's schedule
///
/// # Example
/// ```
/// use reward_ledger_core_rs::AccessRecord;
///
/// let mut record = AccessRecord::new();
/// assert!(!record.is_whitelisted());
/// assert_eq!(record.last_claimed_day(), 0);
///
/// record.grant_whitelist();
/// record.record_claim(3);
/// assert_eq!(record.last_claimed_day(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Whether the principal may claim (never revoked once granted)
    whitelisted: bool,

    /// Highest day index already claimed; 0 means never claimed
    last_claimed_day: u64,
}

impl AccessRecord {
    /// Create the implicit starting record: not whitelisted, day 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct a record from checkpoint data
    pub fn from_snapshot(whitelisted: bool, last_claimed_day: u64) -> Self {
        Self {
            whitelisted,
            last_claimed_day,
        }
    }

    /// Whether the principal is whitelisted
    pub fn is_whitelisted(&self) -> bool {
        self.whitelisted
    }

    /// Get the claimed-day watermark
    pub fn last_claimed_day(&self) -> u64 {
        self.last_claimed_day
    }

    /// Grant claim access (idempotent; there is no revocation)
    pub fn grant_whitelist(&mut self) {
        self.whitelisted = true;
    }

    /// Advance the claimed-day watermark after a successful claim
    ///
    /// # Panics
    /// Panics if `day` does not move the watermark forward; the
    /// orchestrator only records claims with at least one pending day.
    pub fn record_claim(&mut self, day: u64) {
        assert!(
            day > self.last_claimed_day,
            "claimed day must advance the watermark"
        );
        self.last_claimed_day = day;
    }
}
