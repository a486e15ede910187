//! Single-asset treasury — the value-transfer primitive.
//!
//! Tracks spendable balances per account plus a custody pool of held
//! funds. All mutations are atomic: either the full operation succeeds
//! or no balance changes.

use std::collections::{HashMap, HashSet};

use opencourt_types::{AccountId, OpencourtError, Result};
use rust_decimal::Decimal;

/// In-memory balance book with a custody pool.
///
/// The Treasury is the source of truth for all funds. The EscrowLedger
/// calls into it to hold the buyer's payment at purchase time and to
/// pay it out on confirmed delivery or on a verdict.
pub struct Treasury {
    /// Spendable balance per account.
    accounts: HashMap<AccountId, Decimal>,
    /// Funds in custody, attributed to no account until paid out.
    held: Decimal,
    /// Accounts that currently refuse incoming payouts.
    suspended: HashSet<AccountId>,
    /// Lifetime inflow, for conservation checks.
    deposited: Decimal,
}

impl Treasury {
    /// Create a new empty treasury.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            held: Decimal::ZERO,
            suspended: HashSet::new(),
            deposited: Decimal::ZERO,
        }
    }

    /// Deposit external funds into an account.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `amount` is not strictly positive.
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        if amount.is_zero() || amount.is_sign_negative() {
            return Err(OpencourtError::InvalidInput {
                reason: format!("Deposit amount must be positive, got {amount}"),
            });
        }
        *self.accounts.entry(account).or_insert(Decimal::ZERO) += amount;
        self.deposited += amount;
        Ok(())
    }

    /// Move spendable balance into the custody pool (spendable → held).
    /// Used when a purchase opens an escrow.
    ///
    /// # Errors
    /// Returns `TransferFailed` if the payer's balance is insufficient.
    pub fn hold(&mut self, from: AccountId, amount: Decimal) -> Result<()> {
        let balance = self.accounts.entry(from).or_insert(Decimal::ZERO);
        if *balance < amount {
            return Err(OpencourtError::TransferFailed {
                account: from,
                amount,
                reason: format!("insufficient balance: {balance} available"),
            });
        }
        *balance -= amount;
        self.held += amount;
        Ok(())
    }

    /// Pay out of the custody pool (held → spendable). Used when an
    /// escrow releases to the seller or refunds the buyer.
    ///
    /// # Errors
    /// - `TransferFailed` if the recipient refuses the payout (suspended)
    /// - `CustodyInvariantViolation` if the pool does not cover the amount
    pub fn release(&mut self, to: AccountId, amount: Decimal) -> Result<()> {
        if self.suspended.contains(&to) {
            return Err(OpencourtError::TransferFailed {
                account: to,
                amount,
                reason: "recipient refuses the payout".to_string(),
            });
        }
        if self.held < amount {
            return Err(OpencourtError::CustodyInvariantViolation {
                reason: format!("custody pool {} cannot cover payout {amount}", self.held),
            });
        }
        self.held -= amount;
        *self.accounts.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    /// Make an account refuse payouts. Exercises every transfer-failure path.
    pub fn suspend(&mut self, account: AccountId) {
        self.suspended.insert(account);
    }

    /// Allow payouts to a suspended account again.
    pub fn reinstate(&mut self, account: AccountId) {
        self.suspended.remove(&account);
    }

    /// Spendable balance for an account (zero for unknown accounts).
    #[must_use]
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.accounts.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total funds currently in the custody pool.
    #[must_use]
    pub fn held(&self) -> Decimal {
        self.held
    }

    /// Lifetime deposits since creation.
    #[must_use]
    pub fn deposited(&self) -> Decimal {
        self.deposited
    }

    /// Whether an account currently refuses payouts.
    #[must_use]
    pub fn is_suspended(&self, account: &AccountId) -> bool {
        self.suspended.contains(account)
    }

    /// Verify the conservation invariant:
    /// Σ spendable balances + custody pool == lifetime deposits.
    ///
    /// # Errors
    /// Returns `CustodyInvariantViolation` if the books do not balance.
    pub fn verify_conservation(&self) -> Result<()> {
        let circulating: Decimal = self.accounts.values().copied().sum();
        let actual = circulating + self.held;
        if actual != self.deposited {
            return Err(OpencourtError::CustodyInvariantViolation {
                reason: format!(
                    "balances {circulating} + held {} != deposited {}",
                    self.held, self.deposited,
                ),
            });
        }
        Ok(())
    }
}

impl Default for Treasury {
    fn default() -> Self {
        Self::new()
    }
}
