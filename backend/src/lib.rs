//! Reward Ledger Core - Rust Engine
//!
//! Scheduled token-accrual and claim ledger with deterministic day arithmetic.
//!
//! # Architecture
//!
//! - **core**: Accrual day and release boundary arithmetic
//! - **models**: Domain types (Schedule, AccessRecord, State, Events)
//! - **registry**: Session existence checks (collaborator seam)
//! - **tokens**: Token balance store (collaborator seam)
//! - **orchestrator**: Operation surface and checkpointing
//!
//! # Critical Invariants
//!
//! 1. All token amounts and timestamps are u64
//! 2. Accrual is pure arithmetic over (now, epoch_start); no clocks inside
//! 3. Failed operations change no state and log no event
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod tokens;

// Re-exports for convenience
pub use crate::core::accrual::{AccrualEngine, ClaimTiming, SECONDS_PER_DAY, SECONDS_PER_HOUR};
pub use models::{
    access::AccessRecord,
    event::{EventLog, LedgerEvent},
    schedule::Schedule,
    state::LedgerState,
};
pub use orchestrator::{
    AccrualLedger, ClaimableStatus, LedgerConfig, LedgerError, StateSnapshot,
};
pub use registry::{InMemorySessionRegistry, SessionRegistry};
pub use tokens::{InMemoryTokenLedger, TokenError, TokenLedger};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn reward_ledger_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::ledger::PyRewardLedger>()?;
    Ok(())
}
