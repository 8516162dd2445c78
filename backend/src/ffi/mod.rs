//! Python FFI boundary
//!
//! Thin PyO3 wrappers over the ledger; all semantics live in the Rust
//! modules these wrappers delegate to.

pub mod ledger;
pub mod types;

pub use ledger::PyRewardLedger;
