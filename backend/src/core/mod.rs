//! Core timing primitives

pub mod accrual;

pub use accrual::{AccrualEngine, ClaimTiming, SECONDS_PER_DAY, SECONDS_PER_HOUR};
