//! Accrual Ledger Engine
//!
//! The orchestrator that ties the pieces together:
//! - Schedule registration and lifecycle (admin surface)
//! - Claim and spend processing against the token ledger
//! - Read-only queries, single-item and batch
//! - Event logging (complete mutation history)
//! - Checkpointing (save/load of ledger state)
//!
//! # Operation flow
//!
//! Every mutating operation validates all of its preconditions before
//! touching any state; an error therefore implies zero state change and no
//! logged event. Batch queries map the single-item query over their input,
//! so a batch element can never disagree with the corresponding single
//! call.
//!
//! # Example
//!
//! ```rust
//! use reward_ledger_core_rs::orchestrator::{AccrualLedger, LedgerConfig};
//!
//! let config = LedgerConfig {
//!     owner: "admin".to_string(),
//!     epoch_start: 1_000,
//!     session_ids: vec![42],
//! };
//!
//! let mut ledger = AccrualLedger::new(config).unwrap();
//! let entitlement_id = ledger.register("admin", 42, 100, 7).unwrap();
//! assert_eq!(entitlement_id, 1);
//!
//! ledger.whitelist("admin", 42, "alice").unwrap();
//!
//! // Day 1, at the 07:00 release boundary: one allotment claimable.
//! let now = 1_000 + 86_400 + 25_200;
//! let minted = ledger.claim("alice", 42, now).unwrap();
//! assert_eq!(minted, 100);
//! assert_eq!(ledger.balance_of(42, "alice"), 100);
//! ```

use crate::core::accrual::{AccrualEngine, ClaimTiming};
use crate::models::event::{EventLog, LedgerEvent};
use crate::models::schedule::Schedule;
use crate::models::state::LedgerState;
use crate::orchestrator::checkpoint::{
    compute_config_hash, validate_snapshot, AccessSnapshot, ScheduleSnapshot, StateSnapshot,
};
use crate::registry::{InMemorySessionRegistry, SessionRegistry};
use crate::tokens::{InMemoryTokenLedger, TokenError, TokenLedger};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete ledger configuration
///
/// Fixed for the lifetime of a ledger instance: the owner cannot be
/// transferred and the epoch cannot move, so checkpoints hash this struct
/// to refuse restores under a different identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The only caller allowed to register, whitelist, and toggle schedules
    pub owner: String,

    /// Timestamp (seconds) from which accrual day 0 is counted
    pub epoch_start: u64,

    /// Session ids used to seed the in-memory registry when no external
    /// registry is supplied; advisory otherwise
    pub session_ids: Vec<u64>,
}

// ============================================================================
// Ledger Errors
// ============================================================================

/// Ledger error taxonomy
///
/// Operation preconditions come first; the trailing variants belong to the
/// checkpoint layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the configured owner
    #[error("Caller {caller} is not the ledger owner")]
    NotAuthorized { caller: String },

    /// The session registry does not know the simulation id
    #[error("Simulation {simulation_id} does not exist in the session registry")]
    SimulationNotFound { simulation_id: u64 },

    /// No schedule exists for the simulation id
    #[error("Simulation {simulation_id} is not registered")]
    SimulationNotRegistered { simulation_id: u64 },

    /// A schedule already exists for the simulation id
    #[error("Simulation {simulation_id} is already registered")]
    SimulationAlreadyRegistered { simulation_id: u64 },

    /// The schedule exists but is switched off
    #[error("Simulation {simulation_id} is not active")]
    SimulationNotActive { simulation_id: u64 },

    /// The principal has no claim access for the simulation
    #[error("Principal {principal} is not whitelisted for simulation {simulation_id}")]
    NotWhitelisted {
        simulation_id: u64,
        principal: String,
    },

    /// No pending day to claim (the watermark already covers the claimable day)
    #[error("Already claimed today for simulation {simulation_id}")]
    AlreadyClaimedToday { simulation_id: u64 },

    /// Balance too low for the requested burn
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    /// Configuration or registration parameter validation error
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Checkpoint serialization error
    #[error("Serialization failed: {0}")]
    SerializationError(String),

    /// Checkpoint deserialization error
    #[error("Deserialization failed: {0}")]
    DeserializationError(String),

    /// Checkpoint was produced under a different configuration
    #[error("Config mismatch: expected hash {expected}, found {actual}")]
    ConfigMismatch { expected: String, actual: String },

    /// Checkpoint violates a structural ledger invariant
    #[error("State validation failed: {0}")]
    StateValidationError(String),
}

impl From<TokenError> for LedgerError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InsufficientBalance {
                required,
                available,
            } => LedgerError::InsufficientBalance {
                required,
                available,
            },
        }
    }
}

// ============================================================================
// Query Records
// ============================================================================

/// Claimability of one simulation for one principal at a given instant
///
/// Unregistered simulation ids yield the all-false/zero record rather than
/// an error, so batch queries stay total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimableStatus {
    /// Simulation id the record answers for (echoed for batch callers)
    pub simulation_id: u64,

    /// Whether the principal is whitelisted for the simulation
    pub is_whitelisted: bool,

    /// Whether the schedule is active
    pub is_active: bool,

    /// Tokens a claim would mint right now; 0 unless whitelisted AND active
    pub claimable_tokens: u64,
}

// ============================================================================
// Accrual Ledger
// ============================================================================

/// Main orchestrator owning ledger state and collaborator handles
///
/// The ledger owns its schedule and access stores outright. The session
/// registry and token ledger are collaborators behind trait objects: the
/// registry answers existence checks at registration, the token ledger
/// holds every balance the ledger mints into or burns from.
pub struct AccrualLedger {
    /// Immutable configuration (owner, epoch, seeded sessions)
    config: LedgerConfig,

    /// Day/boundary arithmetic anchored at the config epoch
    accrual: AccrualEngine,

    /// Schedules and access records
    state: LedgerState,

    /// Next entitlement id to assign (starts at 1, never reused)
    next_entitlement_id: u64,

    /// Authoritative list of existing simulations
    registry: Box<dyn SessionRegistry>,

    /// Balance store for entitlement tokens
    tokens: Box<dyn TokenLedger>,

    /// Event log (all successful mutations)
    event_log: EventLog,
}

impl AccrualLedger {
    /// Create a new ledger with in-memory collaborators
    ///
    /// The session registry is seeded from `config.session_ids`; the token
    /// ledger starts empty. Use [`AccrualLedger::with_collaborators`] to
    /// attach external implementations instead.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an empty owner or duplicate
    /// session ids.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reward_ledger_core_rs::orchestrator::{AccrualLedger, LedgerConfig};
    ///
    /// let ledger = AccrualLedger::new(LedgerConfig {
    ///     owner: "admin".to_string(),
    ///     epoch_start: 1_000,
    ///     session_ids: vec![1, 2],
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(ledger.owner(), "admin");
    /// assert_eq!(ledger.next_entitlement_id(), 1);
    /// ```
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let registry = InMemorySessionRegistry::with_sessions(&config.session_ids);
        Self::with_collaborators(config, Box::new(registry), Box::new(InMemoryTokenLedger::new()))
    }

    /// Create a new ledger with externally supplied collaborators
    ///
    /// `config.session_ids` is not consulted in this path; the supplied
    /// registry is authoritative for existence checks.
    pub fn with_collaborators(
        config: LedgerConfig,
        registry: Box<dyn SessionRegistry>,
        tokens: Box<dyn TokenLedger>,
    ) -> Result<Self, LedgerError> {
        Self::validate_config(&config)?;

        let accrual = AccrualEngine::new(config.epoch_start);

        Ok(Self {
            config,
            accrual,
            state: LedgerState::new(),
            next_entitlement_id: 1,
            registry,
            tokens,
            event_log: EventLog::new(),
        })
    }

    /// Validate configuration
    fn validate_config(config: &LedgerConfig) -> Result<(), LedgerError> {
        if config.owner.is_empty() {
            return Err(LedgerError::InvalidConfiguration(
                "owner must not be empty".to_string(),
            ));
        }

        // Check for duplicate session ids
        let mut ids = HashSet::new();
        for session_id in &config.session_ids {
            if !ids.insert(session_id) {
                return Err(LedgerError::InvalidConfiguration(format!(
                    "Duplicate session id: {}",
                    session_id
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the administrative owner
    pub fn owner(&self) -> &str {
        &self.config.owner
    }

    /// Get the epoch the accrual day grid is anchored to
    pub fn epoch_start(&self) -> u64 {
        self.config.epoch_start
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get reference to the accrual engine
    pub fn accrual(&self) -> &AccrualEngine {
        &self.accrual
    }

    /// Get the next entitlement id that registration would assign
    pub fn next_entitlement_id(&self) -> u64 {
        self.next_entitlement_id
    }

    /// Get reference to ledger state
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Get mutable reference to ledger state
    ///
    /// # Safety
    ///
    /// This is primarily for testing. Direct state mutation bypasses
    /// operation preconditions. Use with caution.
    pub fn state_mut(&mut self) -> &mut LedgerState {
        &mut self.state
    }

    /// Get total events logged
    pub fn event_count(&self) -> usize {
        self.event_log.len()
    }

    /// Get reference to event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    // ========================================================================
    // Admin Operations
    // ========================================================================

    /// Register a simulation for accrual
    ///
    /// Assigns the next entitlement id, stores the schedule, and activates
    /// it. The simulation id must exist in the session registry and must
    /// not already be registered; re-registration never overwrites.
    ///
    /// # Arguments
    ///
    /// * `caller` - Must be the configured owner
    /// * `simulation_id` - External simulation id to register
    /// * `daily_amount` - Tokens accrued per elapsed day (positive)
    /// * `release_hour` - Hour of day [0, 23] at which a day unlocks
    ///
    /// # Returns
    ///
    /// The entitlement id assigned to the schedule (1, 2, 3, ... in
    /// registration order).
    ///
    /// # Errors
    ///
    /// `NotAuthorized`, `SimulationNotFound`, `SimulationAlreadyRegistered`,
    /// or `InvalidConfiguration` for a zero daily amount or an
    /// out-of-range release hour.
    pub fn register(
        &mut self,
        caller: &str,
        simulation_id: u64,
        daily_amount: u64,
        release_hour: u8,
    ) -> Result<u64, LedgerError> {
        self.ensure_owner(caller)?;

        if !self.registry.exists(simulation_id) {
            return Err(LedgerError::SimulationNotFound { simulation_id });
        }
        if self.state.is_registered(simulation_id) {
            return Err(LedgerError::SimulationAlreadyRegistered { simulation_id });
        }
        if daily_amount == 0 {
            return Err(LedgerError::InvalidConfiguration(
                "daily_amount must be positive".to_string(),
            ));
        }
        if release_hour > 23 {
            return Err(LedgerError::InvalidConfiguration(
                "release_hour must be at most 23".to_string(),
            ));
        }

        let entitlement_id = self.next_entitlement_id;
        self.state.add_schedule(Schedule::new(
            simulation_id,
            entitlement_id,
            daily_amount,
            release_hour,
        ));
        self.next_entitlement_id += 1;

        self.event_log.log(LedgerEvent::SimulationRegistered {
            simulation_id,
            entitlement_id,
            daily_amount,
            release_hour,
        });

        Ok(entitlement_id)
    }

    /// Grant a principal claim access for a registered simulation
    ///
    /// Whitelisting is set-once-true: repeating the call succeeds and
    /// leaves the record whitelisted. There is no revocation; deactivating
    /// the schedule is the way to stop claims.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` or `SimulationNotRegistered`.
    pub fn whitelist(
        &mut self,
        caller: &str,
        simulation_id: u64,
        principal: &str,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;

        if !self.state.is_registered(simulation_id) {
            return Err(LedgerError::SimulationNotRegistered { simulation_id });
        }

        self.state.access_mut(simulation_id, principal).grant_whitelist();

        self.event_log.log(LedgerEvent::PrincipalWhitelisted {
            simulation_id,
            principal: principal.to_string(),
        });

        Ok(())
    }

    /// Switch a registered schedule on (idempotent)
    ///
    /// # Errors
    ///
    /// `NotAuthorized` or `SimulationNotRegistered`.
    pub fn activate(&mut self, caller: &str, simulation_id: u64) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;

        let schedule = self
            .state
            .get_schedule_mut(simulation_id)
            .ok_or(LedgerError::SimulationNotRegistered { simulation_id })?;
        schedule.activate();

        self.event_log
            .log(LedgerEvent::SimulationActivated { simulation_id });

        Ok(())
    }

    /// Switch a registered schedule off (idempotent)
    ///
    /// Accrual keeps counting against the epoch grid while a schedule is
    /// inactive; reactivating exposes the days accumulated in between.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` or `SimulationNotRegistered`.
    pub fn deactivate(&mut self, caller: &str, simulation_id: u64) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;

        let schedule = self
            .state
            .get_schedule_mut(simulation_id)
            .ok_or(LedgerError::SimulationNotRegistered { simulation_id })?;
        schedule.deactivate();

        self.event_log
            .log(LedgerEvent::SimulationDeactivated { simulation_id });

        Ok(())
    }

    /// Owner gate shared by the admin operations
    fn ensure_owner(&self, caller: &str) -> Result<(), LedgerError> {
        if caller != self.config.owner {
            return Err(LedgerError::NotAuthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Principal Operations
    // ========================================================================

    /// Claim every pending daily allotment at once
    ///
    /// Mints `pending_days * daily_amount` to the caller's balance under
    /// the schedule's entitlement id and advances the claimed-day
    /// watermark to the current claimable day. Catch-up claims are the
    /// norm: a principal who skipped K days receives exactly K allotments,
    /// the same total K daily claims would have minted.
    ///
    /// # Returns
    ///
    /// The amount minted.
    ///
    /// # Errors
    ///
    /// `SimulationNotRegistered`, `SimulationNotActive`, `NotWhitelisted`,
    /// or `AlreadyClaimedToday` when no day is pending. A failed claim
    /// changes nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reward_ledger_core_rs::orchestrator::{AccrualLedger, LedgerConfig};
    ///
    /// let mut ledger = AccrualLedger::new(LedgerConfig {
    ///     owner: "admin".to_string(),
    ///     epoch_start: 1_000,
    ///     session_ids: vec![42],
    /// })
    /// .unwrap();
    /// ledger.register("admin", 42, 100, 7).unwrap();
    /// ledger.whitelist("admin", 42, "alice").unwrap();
    ///
    /// // Three days elapsed without a claim: one catch-up claim mints all
    /// // three allotments.
    /// let now = 1_000 + 3 * 86_400 + 25_200;
    /// assert_eq!(ledger.claim("alice", 42, now).unwrap(), 300);
    /// ```
    pub fn claim(&mut self, caller: &str, simulation_id: u64, now: u64) -> Result<u64, LedgerError> {
        let schedule = self
            .state
            .get_schedule(simulation_id)
            .ok_or(LedgerError::SimulationNotRegistered { simulation_id })?;
        if !schedule.is_active() {
            return Err(LedgerError::SimulationNotActive { simulation_id });
        }
        let entitlement_id = schedule.entitlement_id();
        let daily_amount = schedule.daily_amount();
        let release_hour = schedule.release_hour();

        if !self.state.is_whitelisted(simulation_id, caller) {
            return Err(LedgerError::NotWhitelisted {
                simulation_id,
                principal: caller.to_string(),
            });
        }

        let last_claimed = self.state.last_claimed_day(simulation_id, caller);
        let claimable_day = self.accrual.claimable_day(now, release_hour);
        let days_claimed = claimable_day.saturating_sub(last_claimed);
        if days_claimed == 0 {
            return Err(LedgerError::AlreadyClaimedToday { simulation_id });
        }

        let amount = days_claimed * daily_amount;
        self.tokens.mint(caller, entitlement_id, amount);
        self.state
            .access_mut(simulation_id, caller)
            .record_claim(claimable_day);

        self.event_log.log(LedgerEvent::TokensClaimed {
            simulation_id,
            principal: caller.to_string(),
            day: claimable_day,
            days_claimed,
            amount,
        });

        Ok(amount)
    }

    /// Burn tokens from the caller's balance under a simulation's schedule
    ///
    /// Requires the schedule to be active but not the caller to be
    /// whitelisted: tokens already claimed stay spendable by whoever holds
    /// them, as long as the simulation itself accepts spends.
    ///
    /// # Errors
    ///
    /// `SimulationNotRegistered`, `SimulationNotActive`, or
    /// `InsufficientBalance`; the balance is untouched on failure.
    pub fn spend(
        &mut self,
        caller: &str,
        simulation_id: u64,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let schedule = self
            .state
            .get_schedule(simulation_id)
            .ok_or(LedgerError::SimulationNotRegistered { simulation_id })?;
        if !schedule.is_active() {
            return Err(LedgerError::SimulationNotActive { simulation_id });
        }
        let entitlement_id = schedule.entitlement_id();

        self.tokens.burn(caller, entitlement_id, amount)?;

        self.event_log.log(LedgerEvent::TokensSpent {
            simulation_id,
            principal: caller.to_string(),
            amount,
        });

        Ok(())
    }

    // ========================================================================
    // Read-Only Queries
    // ========================================================================

    /// Whether a schedule exists for the simulation id
    pub fn is_registered(&self, simulation_id: u64) -> bool {
        self.state.is_registered(simulation_id)
    }

    /// Whether the schedule exists and is active (false when unregistered)
    pub fn is_active(&self, simulation_id: u64) -> bool {
        self.state
            .get_schedule(simulation_id)
            .map(Schedule::is_active)
            .unwrap_or(false)
    }

    /// Whether a principal is whitelisted (false when unregistered or absent)
    pub fn is_whitelisted(&self, simulation_id: u64, principal: &str) -> bool {
        self.state.is_whitelisted(simulation_id, principal)
    }

    /// Get reference to a schedule by simulation id
    pub fn get_schedule(&self, simulation_id: u64) -> Option<&Schedule> {
        self.state.get_schedule(simulation_id)
    }

    /// Get a principal's balance under a simulation's entitlement
    ///
    /// Returns 0 for unregistered simulation ids.
    pub fn balance_of(&self, simulation_id: u64, principal: &str) -> u64 {
        match self.state.get_schedule(simulation_id) {
            Some(schedule) => self.tokens.balance_of(principal, schedule.entitlement_id()),
            None => 0,
        }
    }

    /// Claimability record for one simulation and principal
    ///
    /// `claimable_tokens` is zeroed unless the principal is whitelisted AND
    /// the schedule is active; the flags report why. Unregistered ids
    /// yield the all-default record.
    pub fn claimable_status(
        &self,
        simulation_id: u64,
        principal: &str,
        now: u64,
    ) -> ClaimableStatus {
        let schedule = match self.state.get_schedule(simulation_id) {
            Some(schedule) => schedule,
            None => {
                return ClaimableStatus {
                    simulation_id,
                    is_whitelisted: false,
                    is_active: false,
                    claimable_tokens: 0,
                }
            }
        };

        let is_whitelisted = self.state.is_whitelisted(simulation_id, principal);
        let is_active = schedule.is_active();
        let claimable_tokens = if is_whitelisted && is_active {
            let last_claimed = self.state.last_claimed_day(simulation_id, principal);
            self.accrual
                .pending_days(now, schedule.release_hour(), last_claimed)
                * schedule.daily_amount()
        } else {
            0
        };

        ClaimableStatus {
            simulation_id,
            is_whitelisted,
            is_active,
            claimable_tokens,
        }
    }

    /// Claim timing for one simulation and principal
    ///
    /// Unlike [`AccrualLedger::claimable_status`], this is pure schedule
    /// arithmetic: neither the whitelist nor the active flag gates it. A
    /// principal can watch the countdown for a schedule they are not (yet)
    /// whitelisted on. Unregistered ids yield the zero-valued record.
    pub fn time_until_next_claim(
        &self,
        simulation_id: u64,
        principal: &str,
        now: u64,
    ) -> ClaimTiming {
        match self.state.get_schedule(simulation_id) {
            Some(schedule) => self.accrual.claim_timing(
                now,
                schedule.release_hour(),
                self.state.last_claimed_day(simulation_id, principal),
            ),
            None => ClaimTiming::default(),
        }
    }

    /// Claimability records for many simulations at once
    ///
    /// Order-preserving, one output per input (duplicates included); each
    /// element is exactly what the single-item query returns.
    pub fn claimable_batch(
        &self,
        principal: &str,
        simulation_ids: &[u64],
        now: u64,
    ) -> Vec<ClaimableStatus> {
        simulation_ids
            .iter()
            .map(|&simulation_id| self.claimable_status(simulation_id, principal, now))
            .collect()
    }

    /// Claim timing records for many simulations at once
    ///
    /// Same shape guarantees as [`AccrualLedger::claimable_batch`], and
    /// the same gating asymmetry as the single-item timing query: records
    /// are computed whether or not the principal is whitelisted or the
    /// schedule active.
    pub fn time_until_next_claim_batch(
        &self,
        principal: &str,
        simulation_ids: &[u64],
        now: u64,
    ) -> Vec<ClaimTiming> {
        simulation_ids
            .iter()
            .map(|&simulation_id| self.time_until_next_claim(simulation_id, principal, now))
            .collect()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize the ledger's own state to JSON
    ///
    /// The snapshot covers schedules, access records, and the entitlement
    /// counter; token balances live in the token ledger collaborator and
    /// the event log restarts empty on restore. Snapshot vectors are
    /// sorted so the output is deterministic.
    pub fn save_state(&self) -> Result<String, LedgerError> {
        let snapshot = self.snapshot()?;
        validate_snapshot(&snapshot)?;
        serde_json::to_string(&snapshot)
            .map_err(|e| LedgerError::SerializationError(e.to_string()))
    }

    /// Restore a ledger from JSON produced by [`AccrualLedger::save_state`]
    ///
    /// The config must hash to the same value as the one that produced the
    /// snapshot; collaborators are attached fresh, exactly as in
    /// [`AccrualLedger::with_collaborators`].
    ///
    /// # Errors
    ///
    /// `DeserializationError` for malformed JSON, `ConfigMismatch` for a
    /// foreign config, `StateValidationError` for a snapshot violating
    /// ledger invariants.
    pub fn load_state(
        config: LedgerConfig,
        state_json: &str,
        registry: Box<dyn SessionRegistry>,
        tokens: Box<dyn TokenLedger>,
    ) -> Result<Self, LedgerError> {
        let snapshot: StateSnapshot = serde_json::from_str(state_json)
            .map_err(|e| LedgerError::DeserializationError(e.to_string()))?;

        let expected = compute_config_hash(&config)?;
        if snapshot.config_hash != expected {
            return Err(LedgerError::ConfigMismatch {
                expected,
                actual: snapshot.config_hash,
            });
        }
        if snapshot.owner != config.owner || snapshot.epoch_start != config.epoch_start {
            return Err(LedgerError::StateValidationError(
                "Snapshot owner/epoch does not match config".to_string(),
            ));
        }

        validate_snapshot(&snapshot)?;

        let mut ledger = Self::with_collaborators(config, registry, tokens)?;
        for schedule_snapshot in &snapshot.schedules {
            ledger.state.add_schedule(Schedule::from(schedule_snapshot));
        }
        for access_snapshot in &snapshot.access_records {
            *ledger
                .state
                .access_mut(access_snapshot.simulation_id, &access_snapshot.principal) =
                access_snapshot.to_record();
        }
        ledger.next_entitlement_id = snapshot.next_entitlement_id;

        Ok(ledger)
    }

    /// Build the snapshot with deterministically ordered vectors
    fn snapshot(&self) -> Result<StateSnapshot, LedgerError> {
        let mut schedules: Vec<ScheduleSnapshot> = self
            .state
            .schedules()
            .values()
            .map(ScheduleSnapshot::from)
            .collect();
        schedules.sort_by_key(|s| s.simulation_id);

        let mut access_records: Vec<AccessSnapshot> = self
            .state
            .access_records()
            .iter()
            .map(|((simulation_id, principal), record)| AccessSnapshot {
                simulation_id: *simulation_id,
                principal: principal.clone(),
                whitelisted: record.is_whitelisted(),
                last_claimed_day: record.last_claimed_day(),
            })
            .collect();
        access_records.sort_by(|a, b| {
            (a.simulation_id, a.principal.as_str()).cmp(&(b.simulation_id, b.principal.as_str()))
        });

        Ok(StateSnapshot {
            config_hash: compute_config_hash(&self.config)?,
            owner: self.config.owner.clone(),
            epoch_start: self.config.epoch_start,
            next_entitlement_id: self.next_entitlement_id,
            schedules,
            access_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LedgerConfig {
        LedgerConfig {
            owner: "admin".to_string(),
            epoch_start: 1_000,
            session_ids: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_empty_owner_rejected() {
        let config = LedgerConfig {
            owner: String::new(),
            epoch_start: 0,
            session_ids: vec![],
        };
        assert!(matches!(
            AccrualLedger::new(config),
            Err(LedgerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_session_ids_rejected() {
        let config = LedgerConfig {
            owner: "admin".to_string(),
            epoch_start: 0,
            session_ids: vec![1, 2, 1],
        };
        assert!(matches!(
            AccrualLedger::new(config),
            Err(LedgerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_new_ledger_starts_clean() {
        let ledger = AccrualLedger::new(test_config()).unwrap();
        assert_eq!(ledger.owner(), "admin");
        assert_eq!(ledger.epoch_start(), 1_000);
        assert_eq!(ledger.next_entitlement_id(), 1);
        assert_eq!(ledger.event_count(), 0);
        assert_eq!(ledger.state().num_schedules(), 0);
    }

    #[test]
    fn test_token_error_conversion() {
        let err: LedgerError = TokenError::InsufficientBalance {
            required: 5,
            available: 2,
        }
        .into();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                required: 5,
                available: 2
            }
        );
    }
}
