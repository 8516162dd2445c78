//! Domain models for the reward ledger

pub mod access;
pub mod event;
pub mod schedule;
pub mod state;

// Re-exports
pub use access::AccessRecord;
pub use event::{EventLog, LedgerEvent};
pub use schedule::Schedule;
pub use state::LedgerState;
