//! Checkpoint - Save/Load Ledger State
//!
//! Serialization of the ledger's own state (schedules, access records, the
//! entitlement counter) for pause/resume. Token balances are the external
//! token ledger's concern and are not captured here; the claimed-day
//! watermarks travel in the snapshot, so a restored ledger never re-mints
//! days that were already claimed.
//!
//! # Critical Invariants
//!
//! - **Config Matching**: state can only be loaded with the config that
//!   produced it (SHA-256 hash comparison)
//! - **Entitlement Continuity**: snapshot entitlement ids are exactly
//!   `1..=N` and the counter resumes at `N + 1`
//! - **Referential Integrity**: every access record points at a registered
//!   simulation

use crate::models::access::AccessRecord;
use crate::models::schedule::Schedule;
use crate::orchestrator::LedgerError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete ledger state snapshot
///
/// Captures everything needed to resume the ledger: the immutable config
/// identity (as a hash plus the owner/epoch fields for readability), the
/// schedule store, the materialized access records, and the entitlement
/// counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// SHA256 hash of the originating config (for validation)
    pub config_hash: String,

    /// Administrative owner at snapshot time
    pub owner: String,

    /// Epoch the accrual day grid is anchored to
    pub epoch_start: u64,

    /// Next entitlement id the ledger would assign
    pub next_entitlement_id: u64,

    /// All registered schedules, sorted by simulation id
    pub schedules: Vec<ScheduleSnapshot>,

    /// All materialized access records, sorted by (simulation id, principal)
    pub access_records: Vec<AccessSnapshot>,
}

/// Schedule snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub simulation_id: u64,
    pub entitlement_id: u64,
    pub daily_amount: u64,
    pub release_hour: u8,
    pub active: bool,
}

impl From<&Schedule> for ScheduleSnapshot {
    fn from(schedule: &Schedule) -> Self {
        ScheduleSnapshot {
            simulation_id: schedule.simulation_id(),
            entitlement_id: schedule.entitlement_id(),
            daily_amount: schedule.daily_amount(),
            release_hour: schedule.release_hour(),
            active: schedule.is_active(),
        }
    }
}

impl From<&ScheduleSnapshot> for Schedule {
    fn from(snapshot: &ScheduleSnapshot) -> Self {
        Schedule::from_snapshot(
            snapshot.simulation_id,
            snapshot.entitlement_id,
            snapshot.daily_amount,
            snapshot.release_hour,
            snapshot.active,
        )
    }
}

/// Access record snapshot, keyed explicitly since the map key is not part
/// of the record itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSnapshot {
    pub simulation_id: u64,
    pub principal: String,
    pub whitelisted: bool,
    pub last_claimed_day: u64,
}

impl AccessSnapshot {
    /// Rebuild the stored record (the key is consumed by the caller)
    pub fn to_record(&self) -> AccessRecord {
        AccessRecord::from_snapshot(self.whitelisted, self.last_claimed_day)
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of a config
///
/// Used to verify that a checkpoint is being restored with the config that
/// produced it. Serializes through canonical JSON (recursively sorted
/// object keys) so the hash is stable across serializer map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, LedgerError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)
        .map_err(|e| LedgerError::SerializationError(format!("Config serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| LedgerError::SerializationError(format!("Config serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate state snapshot integrity
///
/// Checks the structural invariants a well-formed ledger maintains:
/// - non-empty owner
/// - unique simulation ids
/// - entitlement ids exactly `1..=N` with the counter at `N + 1`
/// - positive daily amounts, release hours within `[0, 23]`
/// - access records keyed uniquely and referencing registered simulations
pub fn validate_snapshot(snapshot: &StateSnapshot) -> Result<(), LedgerError> {
    if snapshot.owner.is_empty() {
        return Err(LedgerError::StateValidationError(
            "Snapshot owner is empty".to_string(),
        ));
    }

    // 1. Schedule identity: unique simulation ids, entitlement ids 1..=N.
    let mut simulation_ids = HashSet::new();
    let mut entitlement_ids = HashSet::new();
    let num_schedules = snapshot.schedules.len() as u64;

    for schedule in &snapshot.schedules {
        if !simulation_ids.insert(schedule.simulation_id) {
            return Err(LedgerError::StateValidationError(format!(
                "Duplicate simulation id in snapshot: {}",
                schedule.simulation_id
            )));
        }
        if schedule.entitlement_id == 0 || schedule.entitlement_id > num_schedules {
            return Err(LedgerError::StateValidationError(format!(
                "Entitlement id {} outside 1..={}",
                schedule.entitlement_id, num_schedules
            )));
        }
        if !entitlement_ids.insert(schedule.entitlement_id) {
            return Err(LedgerError::StateValidationError(format!(
                "Duplicate entitlement id in snapshot: {}",
                schedule.entitlement_id
            )));
        }
        if schedule.daily_amount == 0 {
            return Err(LedgerError::StateValidationError(format!(
                "Schedule for simulation {} has zero daily amount",
                schedule.simulation_id
            )));
        }
        if schedule.release_hour > 23 {
            return Err(LedgerError::StateValidationError(format!(
                "Schedule for simulation {} has release hour {}",
                schedule.simulation_id, schedule.release_hour
            )));
        }
    }

    // 2. Counter continuity.
    if snapshot.next_entitlement_id != num_schedules + 1 {
        return Err(LedgerError::StateValidationError(format!(
            "Entitlement counter {} does not follow {} schedules",
            snapshot.next_entitlement_id, num_schedules
        )));
    }

    // 3. Access records: unique keys, no orphans.
    let mut access_keys = HashSet::new();
    for access in &snapshot.access_records {
        if !simulation_ids.contains(&access.simulation_id) {
            return Err(LedgerError::StateValidationError(format!(
                "Access record for unregistered simulation {}",
                access.simulation_id
            )));
        }
        if !access_keys.insert((access.simulation_id, access.principal.as_str())) {
            return Err(LedgerError::StateValidationError(format!(
                "Duplicate access record for simulation {} principal {}",
                access.simulation_id, access.principal
            )));
        }
    }

    Ok(())
}
