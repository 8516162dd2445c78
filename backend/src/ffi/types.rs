//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList, etc.)

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::accrual::ClaimTiming;
use crate::models::event::LedgerEvent;
use crate::models::schedule::Schedule;
use crate::orchestrator::{ClaimableStatus, LedgerConfig, LedgerError};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if:
/// - Field is missing
/// - Type conversion fails
///
/// # Example
/// ```ignore
/// let value: u64 = extract_required(&py_dict, "epoch_start")?;
/// ```
fn extract_required<'py, T: FromPyObject<'py>>(
    dict: &Bound<'py, PyDict>,
    key: &str,
) -> PyResult<T> {
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_with_default<'py, T: FromPyObject<'py>>(
    dict: &Bound<'py, PyDict>,
    key: &str,
    default: T,
) -> PyResult<T> {
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Configuration Parser
// ========================================================================

/// Convert Python dict to LedgerConfig
///
/// Expected format:
/// ```python
/// {
///     "owner": "admin",
///     "epoch_start": 1704067200,
///     "session_ids": [1, 2, 3],  # optional, defaults to []
/// }
/// ```
///
/// # Errors
///
/// Returns PyErr if:
/// - Required fields missing
/// - Type conversions fail
pub fn parse_ledger_config(py_config: &Bound<'_, PyDict>) -> PyResult<LedgerConfig> {
    let owner: String = extract_required(py_config, "owner")?;
    let epoch_start: u64 = extract_required(py_config, "epoch_start")?;
    let session_ids: Vec<u64> = extract_with_default(py_config, "session_ids", Vec::new())?;

    Ok(LedgerConfig {
        owner,
        epoch_start,
        session_ids,
    })
}

// ========================================================================
// Result Converters
// ========================================================================

/// Convert ClaimTiming to Python dict
pub fn timing_to_py(py: Python, timing: &ClaimTiming) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("can_claim_now", timing.can_claim_now)?;
    dict.set_item("seconds_until_next", timing.seconds_until_next)?;
    dict.set_item("next_claim_day", timing.next_claim_day)?;
    dict.set_item("current_day", timing.current_day)?;

    Ok(dict.into())
}

/// Convert ClaimableStatus to Python dict
pub fn status_to_py(py: Python, status: &ClaimableStatus) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("simulation_id", status.simulation_id)?;
    dict.set_item("is_whitelisted", status.is_whitelisted)?;
    dict.set_item("is_active", status.is_active)?;
    dict.set_item("claimable_tokens", status.claimable_tokens)?;

    Ok(dict.into())
}

/// Convert Schedule to Python dict
pub fn schedule_to_py(py: Python, schedule: &Schedule) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("simulation_id", schedule.simulation_id())?;
    dict.set_item("entitlement_id", schedule.entitlement_id())?;
    dict.set_item("daily_amount", schedule.daily_amount())?;
    dict.set_item("release_hour", schedule.release_hour())?;
    dict.set_item("active", schedule.is_active())?;

    Ok(dict.into())
}

/// Convert LedgerEvent to Python dict
///
/// Every dict carries "type" and "simulation_id"; the remaining keys
/// depend on the variant.
pub fn event_to_py(py: Python, event: &LedgerEvent) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("type", event.event_type())?;
    dict.set_item("simulation_id", event.simulation_id())?;

    match event {
        LedgerEvent::SimulationRegistered {
            entitlement_id,
            daily_amount,
            release_hour,
            ..
        } => {
            dict.set_item("entitlement_id", entitlement_id)?;
            dict.set_item("daily_amount", daily_amount)?;
            dict.set_item("release_hour", release_hour)?;
        }
        LedgerEvent::PrincipalWhitelisted { principal, .. } => {
            dict.set_item("principal", principal)?;
        }
        LedgerEvent::SimulationActivated { .. } | LedgerEvent::SimulationDeactivated { .. } => {}
        LedgerEvent::TokensClaimed {
            principal,
            day,
            days_claimed,
            amount,
            ..
        } => {
            dict.set_item("principal", principal)?;
            dict.set_item("day", day)?;
            dict.set_item("days_claimed", days_claimed)?;
            dict.set_item("amount", amount)?;
        }
        LedgerEvent::TokensSpent {
            principal, amount, ..
        } => {
            dict.set_item("principal", principal)?;
            dict.set_item("amount", amount)?;
        }
    }

    Ok(dict.into())
}

// ========================================================================
// Error Mapping
// ========================================================================

/// Convert a ledger error to the Python exception type it should raise
///
/// Operation precondition failures surface as ValueError; serialization
/// and state restoration failures surface as RuntimeError.
pub fn ledger_error_to_py(err: LedgerError) -> PyErr {
    match err {
        LedgerError::SerializationError(_)
        | LedgerError::DeserializationError(_)
        | LedgerError::ConfigMismatch { .. }
        | LedgerError::StateValidationError(_) => {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string())
        }
        _ => PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string()),
    }
}
