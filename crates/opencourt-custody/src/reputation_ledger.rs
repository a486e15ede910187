//! Reputation ledger — monotonic review counters per account.
//!
//! The only callers of the mutators are the escrow ledger (positive
//! review on confirmed delivery) and the dispute path (negative review
//! on a lost verdict). Counters never decrease and are never reset.

use std::collections::HashMap;

use opencourt_types::{AccountId, Reputation};

/// Per-account reputation store.
pub struct ReputationLedger {
    accounts: HashMap<AccountId, Reputation>,
}

impl ReputationLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Record a positive review for an account.
    pub fn credit(&mut self, account: AccountId) {
        self.accounts.entry(account).or_default().credit();
    }

    /// Record a negative review for an account.
    pub fn debit(&mut self, account: AccountId) {
        self.accounts.entry(account).or_default().debit();
    }

    /// Reputation for an account (all-zero for unknown accounts).
    #[must_use]
    pub fn reputation(&self, account: AccountId) -> Reputation {
        self.accounts.get(&account).copied().unwrap_or_default()
    }

    /// Number of accounts with at least one recorded review.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.accounts.len()
    }
}

impl Default for ReputationLedger {
    fn default() -> Self {
        Self::new()
    }
}
