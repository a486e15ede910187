//! Append-only user registry — the sampling universe.
//!
//! Every account that ever listed a product or completed a purchase is
//! recorded here exactly once. The registry is never pruned: the panel
//! selector indexes into its stable insertion order, so entries must
//! neither move nor disappear.

use std::collections::HashSet;

use opencourt_types::AccountId;

/// Idempotent, insertion-ordered account set.
///
/// Membership checks and appends are O(1); `members()` exposes the
/// stable order the panel selector draws from.
pub struct UserRegistry {
    /// Members in insertion order.
    members: Vec<AccountId>,
    /// Membership index for idempotent appends.
    index: HashSet<AccountId>,
}

impl UserRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Record an account. Returns `false` (and changes nothing) when the
    /// account is already registered.
    pub fn add(&mut self, account: AccountId) -> bool {
        if !self.index.insert(account) {
            return false;
        }
        self.members.push(account);
        true
    }

    /// Whether an account has ever been registered.
    #[must_use]
    pub fn contains(&self, account: &AccountId) -> bool {
        self.index.contains(account)
    }

    /// Number of distinct registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no account was ever registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[AccountId] {
        &self.members
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
