//! Token ledger seam
//!
//! Claimed allotments are minted into, and spends burned from, a balance
//! store keyed by (entitlement id, principal). The store is a collaborator:
//! the orchestrator validates operation preconditions and then drives it
//! through this trait. Balances are u64 and can never go negative; `burn`
//! is the one fallible call and fails atomically.

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during token ledger operations
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TokenError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },
}

/// Balance store for entitlement tokens
pub trait TokenLedger: Send + Sync {
    /// Mint `amount` tokens to the principal's balance under an entitlement
    fn mint(&mut self, principal: &str, entitlement_id: u64, amount: u64);

    /// Burn `amount` tokens from the principal's balance under an
    /// entitlement
    ///
    /// Fails with `InsufficientBalance` and leaves the balance untouched
    /// when the balance is short.
    fn burn(&mut self, principal: &str, entitlement_id: u64, amount: u64)
        -> Result<(), TokenError>;

    /// Get the principal's balance under an entitlement (0 when absent)
    fn balance_of(&self, principal: &str, entitlement_id: u64) -> u64;
}

/// Map-backed token ledger for tests and embedded use
///
/// # Example
/// ```
/// use reward_ledger_core_rs::tokens::{InMemoryTokenLedger, TokenLedger};
///
/// let mut ledger = InMemoryTokenLedger::new();
/// ledger.mint("alice", 1, 300);
/// ledger.burn("alice", 1, 100).unwrap();
///
/// assert_eq!(ledger.balance_of("alice", 1), 200);
/// assert!(ledger.burn("alice", 1, 500).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    /// Balances indexed by (entitlement id, principal)
    balances: HashMap<(u64, String), u64>,
}

impl InMemoryTokenLedger {
    /// Create an empty token ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Total tokens in circulation under one entitlement
    pub fn total_supply(&self, entitlement_id: u64) -> u64 {
        self.balances
            .iter()
            .filter(|((id, _), _)| *id == entitlement_id)
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Number of (entitlement, principal) accounts with history
    pub fn num_accounts(&self) -> usize {
        self.balances.len()
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn mint(&mut self, principal: &str, entitlement_id: u64, amount: u64) {
        *self
            .balances
            .entry((entitlement_id, principal.to_string()))
            .or_insert(0) += amount;
    }

    fn burn(
        &mut self,
        principal: &str,
        entitlement_id: u64,
        amount: u64,
    ) -> Result<(), TokenError> {
        let key = (entitlement_id, principal.to_string());
        let available = self.balances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        if let Some(balance) = self.balances.get_mut(&key) {
            *balance -= amount;
        }
        Ok(())
    }

    fn balance_of(&self, principal: &str, entitlement_id: u64) -> u64 {
        self.balances
            .get(&(entitlement_id, principal.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
