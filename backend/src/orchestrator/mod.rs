//! Ledger orchestration module
//!
//! The engine wires configuration, accrual arithmetic, state, and the
//! collaborator seams into the operation surface; the checkpoint layer
//! handles serialization of ledger state.

pub mod checkpoint;
pub mod engine;

pub use checkpoint::{
    compute_config_hash, validate_snapshot, AccessSnapshot, ScheduleSnapshot, StateSnapshot,
};
pub use engine::{AccrualLedger, ClaimableStatus, LedgerConfig, LedgerError};
