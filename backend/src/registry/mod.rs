//! Session registry seam
//!
//! The registry is the authoritative list of simulations that exist. It is
//! owned elsewhere; the ledger only asks one question of it, at
//! registration time: does this simulation id exist? Everything after
//! registration runs off the ledger's own schedule store.

use std::collections::HashSet;

/// Source of truth for simulation existence
///
/// Implementations must be cheap to query; the ledger calls `exists`
/// exactly once per registration attempt.
pub trait SessionRegistry: Send + Sync {
    /// Whether a simulation with this id exists
    fn exists(&self, simulation_id: u64) -> bool;
}

/// Set-backed registry for tests and embedded use
///
/// # Example
/// ```
/// use reward_ledger_core_rs::registry::{InMemorySessionRegistry, SessionRegistry};
///
/// let registry = InMemorySessionRegistry::with_sessions(&[7, 42]);
/// assert!(registry.exists(42));
/// assert!(!registry.exists(99));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRegistry {
    sessions: HashSet<u64>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the given session ids
    pub fn with_sessions(session_ids: &[u64]) -> Self {
        Self {
            sessions: session_ids.iter().copied().collect(),
        }
    }

    /// Add a session id (idempotent)
    pub fn add_session(&mut self, simulation_id: u64) {
        self.sessions.insert(simulation_id);
    }

    /// Get the number of known sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check whether the registry knows no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn exists(&self, simulation_id: u64) -> bool {
        self.sessions.contains(&simulation_id)
    }
}
