//! Event logging for auditing and replay.
//!
//! Every successful mutating operation on the ledger appends exactly one
//! event; failed operations append nothing. The log is the audit surface of
//! the crate: hosts read it to reconstruct what happened and when. It is
//! telemetry, not state, so checkpoints do not carry it.
//!
//! # Example
//!
//! ```rust
//! use reward_ledger_core_rs::models::LedgerEvent;
//!
//! let event = LedgerEvent::TokensClaimed {
//!     simulation_id: 42,
//!     principal: "alice".to_string(),
//!     day: 3,
//!     days_claimed: 3,
//!     amount: 300,
//! };
//!
//! assert_eq!(event.event_type(), "TokensClaimed");
//! assert_eq!(event.simulation_id(), 42);
//! ```

/// Ledger event capturing one successful state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A simulation was registered and its schedule stored
    SimulationRegistered {
        simulation_id: u64,
        entitlement_id: u64,
        daily_amount: u64,
        release_hour: u8,
    },

    /// A principal was granted claim access for a simulation
    PrincipalWhitelisted {
        simulation_id: u64,
        principal: String,
    },

    /// A schedule was switched (back) on
    SimulationActivated { simulation_id: u64 },

    /// A schedule was switched off
    SimulationDeactivated { simulation_id: u64 },

    /// Pending daily allotments were minted to a principal
    TokensClaimed {
        simulation_id: u64,
        principal: String,
        /// Day index the claim covered up to (new watermark)
        day: u64,
        /// Number of whole days the claim covered
        days_claimed: u64,
        /// Tokens minted (`days_claimed * daily_amount`)
        amount: u64,
    },

    /// Tokens were burned from a principal's balance
    TokensSpent {
        simulation_id: u64,
        principal: String,
        amount: u64,
    },
}

impl LedgerEvent {
    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::SimulationRegistered { .. } => "SimulationRegistered",
            LedgerEvent::PrincipalWhitelisted { .. } => "PrincipalWhitelisted",
            LedgerEvent::SimulationActivated { .. } => "SimulationActivated",
            LedgerEvent::SimulationDeactivated { .. } => "SimulationDeactivated",
            LedgerEvent::TokensClaimed { .. } => "TokensClaimed",
            LedgerEvent::TokensSpent { .. } => "TokensSpent",
        }
    }

    /// Get the simulation this event belongs to
    pub fn simulation_id(&self) -> u64 {
        match self {
            LedgerEvent::SimulationRegistered { simulation_id, .. } => *simulation_id,
            LedgerEvent::PrincipalWhitelisted { simulation_id, .. } => *simulation_id,
            LedgerEvent::SimulationActivated { simulation_id } => *simulation_id,
            LedgerEvent::SimulationDeactivated { simulation_id } => *simulation_id,
            LedgerEvent::TokensClaimed { simulation_id, .. } => *simulation_id,
            LedgerEvent::TokensSpent { simulation_id, .. } => *simulation_id,
        }
    }

    /// Get the principal if the event concerns one
    pub fn principal(&self) -> Option<&str> {
        match self {
            LedgerEvent::PrincipalWhitelisted { principal, .. } => Some(principal),
            LedgerEvent::TokensClaimed { principal, .. } => Some(principal),
            LedgerEvent::TokensSpent { principal, .. } => Some(principal),
            _ => None,
        }
    }
}

/// Event log for storing and querying ledger events.
///
/// A simple wrapper around Vec<LedgerEvent> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events in append order
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Get events for a specific simulation
    pub fn events_for_simulation(&self, simulation_id: u64) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.simulation_id() == simulation_id)
            .collect()
    }

    /// Get events for a specific principal
    pub fn events_for_principal(&self, principal: &str) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.principal() == Some(principal))
            .collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claimed(simulation_id: u64, principal: &str, amount: u64) -> LedgerEvent {
        LedgerEvent::TokensClaimed {
            simulation_id,
            principal: principal.to_string(),
            day: 1,
            days_claimed: 1,
            amount,
        }
    }

    #[test]
    fn test_event_type_and_simulation_id() {
        let event = LedgerEvent::SimulationActivated { simulation_id: 7 };
        assert_eq!(event.event_type(), "SimulationActivated");
        assert_eq!(event.simulation_id(), 7);
    }

    #[test]
    fn test_principal_accessor() {
        let event = claimed(1, "alice", 100);
        assert_eq!(event.principal(), Some("alice"));

        let admin_event = LedgerEvent::SimulationRegistered {
            simulation_id: 1,
            entitlement_id: 1,
            daily_amount: 100,
            release_hour: 7,
        };
        assert_eq!(admin_event.principal(), None);
    }

    #[test]
    fn test_event_log_basic() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(claimed(1, "alice", 100));
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn test_event_log_query_by_simulation() {
        let mut log = EventLog::new();
        log.log(claimed(1, "alice", 100));
        log.log(claimed(2, "alice", 50));
        log.log(LedgerEvent::SimulationDeactivated { simulation_id: 1 });

        assert_eq!(log.events_for_simulation(1).len(), 2);
        assert_eq!(log.events_for_simulation(2).len(), 1);
    }

    #[test]
    fn test_event_log_query_by_principal() {
        let mut log = EventLog::new();
        log.log(claimed(1, "alice", 100));
        log.log(claimed(1, "bob", 100));
        log.log(LedgerEvent::TokensSpent {
            simulation_id: 1,
            principal: "alice".to_string(),
            amount: 40,
        });

        assert_eq!(log.events_for_principal("alice").len(), 2);
        assert_eq!(log.events_for_principal("bob").len(), 1);
    }

    #[test]
    fn test_event_log_query_by_type() {
        let mut log = EventLog::new();
        log.log(claimed(1, "alice", 100));
        log.log(LedgerEvent::SimulationActivated { simulation_id: 1 });

        assert_eq!(log.events_of_type("TokensClaimed").len(), 1);
        assert_eq!(log.events_of_type("SimulationActivated").len(), 1);
        assert_eq!(log.events_of_type("TokensSpent").len(), 0);
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = EventLog::new();
        log.log(claimed(1, "alice", 100));
        log.clear();
        assert!(log.is_empty());
    }
}
