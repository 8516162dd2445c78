//! PyO3 wrapper for AccrualLedger
//!
//! This module provides the Python interface to the Rust accrual ledger.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    event_to_py, ledger_error_to_py, parse_ledger_config, schedule_to_py, status_to_py,
    timing_to_py,
};
use crate::orchestrator::AccrualLedger;
use crate::registry::InMemorySessionRegistry;
use crate::tokens::InMemoryTokenLedger;

/// Python wrapper for the Rust AccrualLedger
///
/// This class provides the entry point for Python code to register
/// schedules, process claims and spends, and query accrual state.
///
/// # Example (from Python)
///
/// ```python
/// from reward_ledger._core import RewardLedger
///
/// config = {
///     "owner": "admin",
///     "epoch_start": 1704067200,
///     "session_ids": [42],
/// }
///
/// ledger = RewardLedger.new(config)
/// ledger.register("admin", 42, 100, 7)
/// ledger.whitelist("admin", 42, "alice")
/// minted = ledger.claim("alice", 42, now)
/// print(f"alice claimed {minted} tokens")
/// ```
#[pyclass(name = "RewardLedger")]
pub struct PyRewardLedger {
    inner: AccrualLedger,
}

#[pymethods]
impl PyRewardLedger {
    /// Create a new ledger from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Dictionary with "owner", "epoch_start", and optional
    ///   "session_ids"
    ///
    /// # Returns
    ///
    /// New RewardLedger instance with in-memory collaborators
    ///
    /// # Errors
    ///
    /// Raises ValueError if:
    /// - Required configuration fields missing
    /// - Owner is empty or session ids repeat
    /// - Type conversions fail
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_ledger_config(config)?;

        let inner = AccrualLedger::new(rust_config).map_err(ledger_error_to_py)?;

        Ok(PyRewardLedger { inner })
    }

    // ========================================================================
    // Admin Operations
    // ========================================================================

    /// Register a simulation for daily accrual
    ///
    /// # Arguments
    ///
    /// * `caller` - Must be the configured owner
    /// * `simulation_id` - Simulation to register (must exist in the registry)
    /// * `daily_amount` - Tokens accrued per day (positive)
    /// * `release_hour` - Hour of day [0, 23] at which a day unlocks
    ///
    /// # Returns
    ///
    /// The entitlement id assigned to the schedule
    ///
    /// # Errors
    ///
    /// Raises ValueError for unauthorized callers, unknown or already
    /// registered simulations, and out-of-range parameters
    fn register(
        &mut self,
        caller: &str,
        simulation_id: u64,
        daily_amount: u64,
        release_hour: u8,
    ) -> PyResult<u64> {
        self.inner
            .register(caller, simulation_id, daily_amount, release_hour)
            .map_err(ledger_error_to_py)
    }

    /// Grant a principal claim access for a registered simulation
    fn whitelist(&mut self, caller: &str, simulation_id: u64, principal: &str) -> PyResult<()> {
        self.inner
            .whitelist(caller, simulation_id, principal)
            .map_err(ledger_error_to_py)
    }

    /// Switch a registered schedule on (idempotent)
    fn activate(&mut self, caller: &str, simulation_id: u64) -> PyResult<()> {
        self.inner
            .activate(caller, simulation_id)
            .map_err(ledger_error_to_py)
    }

    /// Switch a registered schedule off (idempotent)
    fn deactivate(&mut self, caller: &str, simulation_id: u64) -> PyResult<()> {
        self.inner
            .deactivate(caller, simulation_id)
            .map_err(ledger_error_to_py)
    }

    // ========================================================================
    // Principal Operations
    // ========================================================================

    /// Claim every pending daily allotment at once
    ///
    /// # Arguments
    ///
    /// * `caller` - Principal claiming (must be whitelisted)
    /// * `simulation_id` - Simulation to claim from
    /// * `now` - Current timestamp in seconds
    ///
    /// # Returns
    ///
    /// The amount minted to the caller's balance
    ///
    /// # Errors
    ///
    /// Raises ValueError when the simulation is unregistered or inactive,
    /// the caller is not whitelisted, or nothing is pending
    fn claim(&mut self, caller: &str, simulation_id: u64, now: u64) -> PyResult<u64> {
        self.inner
            .claim(caller, simulation_id, now)
            .map_err(ledger_error_to_py)
    }

    /// Burn tokens from the caller's balance under a simulation's schedule
    ///
    /// # Errors
    ///
    /// Raises ValueError when the simulation is unregistered or inactive,
    /// or the balance is insufficient
    fn spend(&mut self, caller: &str, simulation_id: u64, amount: u64) -> PyResult<()> {
        self.inner
            .spend(caller, simulation_id, amount)
            .map_err(ledger_error_to_py)
    }

    // ========================================================================
    // State Query Methods
    // ========================================================================

    /// Whether a schedule exists for the simulation id
    fn is_registered(&self, simulation_id: u64) -> bool {
        self.inner.is_registered(simulation_id)
    }

    /// Whether the schedule exists and is active
    fn is_active(&self, simulation_id: u64) -> bool {
        self.inner.is_active(simulation_id)
    }

    /// Whether a principal is whitelisted for a simulation
    fn is_whitelisted(&self, simulation_id: u64, principal: &str) -> bool {
        self.inner.is_whitelisted(simulation_id, principal)
    }

    /// Get a schedule as a dict, or None if unregistered
    ///
    /// # Example (from Python)
    ///
    /// ```python
    /// schedule = ledger.get_schedule(42)
    /// if schedule is not None:
    ///     print(f"releases at hour {schedule['release_hour']}")
    /// ```
    fn get_schedule(&self, py: Python, simulation_id: u64) -> PyResult<Option<Py<PyDict>>> {
        match self.inner.get_schedule(simulation_id) {
            Some(schedule) => Ok(Some(schedule_to_py(py, schedule)?)),
            None => Ok(None),
        }
    }

    /// Get a principal's balance under a simulation's entitlement
    ///
    /// Returns 0 for unregistered simulation ids.
    fn balance_of(&self, simulation_id: u64, principal: &str) -> u64 {
        self.inner.balance_of(simulation_id, principal)
    }

    /// Claimability record for one simulation and principal
    ///
    /// # Returns
    ///
    /// Dictionary with:
    /// - `simulation_id`: Echoed simulation id
    /// - `is_whitelisted`: Whether the principal has claim access
    /// - `is_active`: Whether the schedule is switched on
    /// - `claimable_tokens`: Tokens a claim would mint right now
    fn claimable_status(
        &self,
        py: Python,
        simulation_id: u64,
        principal: &str,
        now: u64,
    ) -> PyResult<Py<PyDict>> {
        let status = self.inner.claimable_status(simulation_id, principal, now);
        status_to_py(py, &status)
    }

    /// Claim timing for one simulation and principal
    ///
    /// # Returns
    ///
    /// Dictionary with:
    /// - `can_claim_now`: Whether a pending day exists
    /// - `seconds_until_next`: Countdown to the next release boundary
    /// - `next_claim_day`: Day index that boundary unlocks
    /// - `current_day`: Calendar day index at `now`
    fn time_until_next_claim(
        &self,
        py: Python,
        simulation_id: u64,
        principal: &str,
        now: u64,
    ) -> PyResult<Py<PyDict>> {
        let timing = self.inner.time_until_next_claim(simulation_id, principal, now);
        timing_to_py(py, &timing)
    }

    /// Claimability records for many simulations at once
    ///
    /// Returns one dict per input id, in input order.
    fn claimable_batch(
        &self,
        py: Python,
        principal: &str,
        simulation_ids: Vec<u64>,
        now: u64,
    ) -> PyResult<Py<PyList>> {
        let statuses = self.inner.claimable_batch(principal, &simulation_ids, now);

        let py_list = PyList::empty(py);
        for status in &statuses {
            py_list.append(status_to_py(py, status)?)?;
        }

        Ok(py_list.into())
    }

    /// Claim timing records for many simulations at once
    ///
    /// Returns one dict per input id, in input order.
    fn time_until_next_claim_batch(
        &self,
        py: Python,
        principal: &str,
        simulation_ids: Vec<u64>,
        now: u64,
    ) -> PyResult<Py<PyList>> {
        let timings = self
            .inner
            .time_until_next_claim_batch(principal, &simulation_ids, now);

        let py_list = PyList::empty(py);
        for timing in &timings {
            py_list.append(timing_to_py(py, timing)?)?;
        }

        Ok(py_list.into())
    }

    /// Get the administrative owner
    fn owner(&self) -> String {
        self.inner.owner().to_string()
    }

    /// Get the epoch the accrual day grid is anchored to
    fn epoch_start(&self) -> u64 {
        self.inner.epoch_start()
    }

    /// Get the next entitlement id registration would assign
    fn next_entitlement_id(&self) -> u64 {
        self.inner.next_entitlement_id()
    }

    /// Get the number of registered schedules
    fn num_schedules(&self) -> usize {
        self.inner.state().num_schedules()
    }

    /// Get total events logged
    fn event_count(&self) -> usize {
        self.inner.event_count()
    }

    /// Get all logged events as dicts, oldest first
    ///
    /// # Example (from Python)
    ///
    /// ```python
    /// for event in ledger.events():
    ///     print(event["type"], event["simulation_id"])
    /// ```
    fn events(&self, py: Python) -> PyResult<Py<PyList>> {
        let py_list = PyList::empty(py);
        for event in self.inner.event_log().events() {
            py_list.append(event_to_py(py, event)?)?;
        }

        Ok(py_list.into())
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize the ledger's own state to a JSON string
    ///
    /// Token balances are not included; they live in the token ledger.
    ///
    /// # Errors
    ///
    /// Raises RuntimeError if serialization fails
    fn save_state(&self) -> PyResult<String> {
        self.inner.save_state().map_err(ledger_error_to_py)
    }

    /// Restore a ledger from a JSON string produced by `save_state`
    ///
    /// Collaborators are rebuilt in-memory from the config, exactly as in
    /// `new`; the config must match the one that produced the snapshot.
    ///
    /// # Errors
    ///
    /// Raises RuntimeError for malformed JSON, a config mismatch, or a
    /// snapshot violating ledger invariants
    #[staticmethod]
    fn load_state(config: &Bound<'_, PyDict>, state_json: &str) -> PyResult<Self> {
        let rust_config = parse_ledger_config(config)?;

        let registry = InMemorySessionRegistry::with_sessions(&rust_config.session_ids);
        let inner = AccrualLedger::load_state(
            rust_config,
            state_json,
            Box::new(registry),
            Box::new(InMemoryTokenLedger::new()),
        )
        .map_err(ledger_error_to_py)?;

        Ok(PyRewardLedger { inner })
    }
}
