//! # Escrow — the custody record
//!
//! An `Escrow` holds a buyer's payment until delivery is confirmed or a
//! dispute over the purchase resolves.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  confirm_delivery   ┌──────────┐
//!   │ HELD ├────────────────────▶│ RELEASED │
//!   └──┬───┘                     └──────────┘
//!      │ open_dispute
//!      ▼
//!   ┌──────────┐
//!   │ DISPUTED │  (final disposition recorded on the Dispute's verdict)
//!   └──────────┘
//! ```
//!
//! ## Invariants
//!
//! - `released` and `disputed` are never both true
//! - `amount` is immutable after creation
//! - a disputed escrow keeps `disputed = true` forever; the payout side of
//!   its resolution is recorded on the dispute record, not here

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, PurchaseId};

/// The derived lifecycle state of an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Funds are in custody. Confirm and dispute are both available.
    Held,
    /// Delivery was confirmed and the seller was paid. Terminal.
    Released,
    /// A dispute was opened; disposition now belongs to the dispute. Terminal here.
    Disputed,
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Held => write!(f, "HELD"),
            Self::Released => write!(f, "RELEASED"),
            Self::Disputed => write!(f, "DISPUTED"),
        }
    }
}

/// A custody record for a single purchase.
///
/// Created once by the purchase operation; mutated only by the escrow
/// ledger's confirm-delivery and open-dispute paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    /// The purchase this record holds funds for.
    pub purchase_id: PurchaseId,
    /// The paying party, and the only account allowed to confirm or dispute.
    pub buyer: AccountId,
    /// The receiving party on confirmed delivery.
    pub seller: AccountId,
    /// Amount held in custody. Immutable after creation.
    pub amount: Decimal,
    /// Set by confirm-delivery after the seller was paid.
    pub released: bool,
    /// Set by open-dispute once a panel was drawn.
    pub disputed: bool,
    /// When the custody record was created.
    pub opened_at: DateTime<Utc>,
}

impl Escrow {
    #[must_use]
    pub fn new(purchase_id: PurchaseId, buyer: AccountId, seller: AccountId, amount: Decimal) -> Self {
        Self {
            purchase_id,
            buyer,
            seller,
            amount,
            released: false,
            disputed: false,
            opened_at: Utc::now(),
        }
    }

    /// Derived state from the two flags.
    #[must_use]
    pub fn state(&self) -> EscrowState {
        match (self.released, self.disputed) {
            (false, false) => EscrowState::Held,
            (true, _) => EscrowState::Released,
            (false, true) => EscrowState::Disputed,
        }
    }

    /// The AlreadySettled guard predicate: no further confirm or dispute allowed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.released || self.disputed
    }

    /// Transition to RELEASED. Called after the seller payout succeeded.
    ///
    /// # Errors
    /// Returns `AlreadySettled` if the escrow was already released or disputed.
    pub fn mark_released(&mut self) -> crate::Result<()> {
        if self.is_settled() {
            return Err(crate::OpencourtError::AlreadySettled(self.purchase_id));
        }
        self.released = true;
        Ok(())
    }

    /// Transition to DISPUTED. Called once a panel was successfully drawn.
    ///
    /// # Errors
    /// Returns `AlreadySettled` if the escrow was already released or disputed.
    pub fn mark_disputed(&mut self) -> crate::Result<()> {
        if self.is_settled() {
            return Err(crate::OpencourtError::AlreadySettled(self.purchase_id));
        }
        self.disputed = true;
        Ok(())
    }
}

/// Dummy escrow for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Escrow {
    /// Create a dummy held escrow for unit tests.
    pub fn dummy(amount: Decimal) -> Self {
        Self::new(
            PurchaseId(rand::random::<u32>().into()),
            AccountId::new(),
            AccountId::new(),
            amount,
        )
    }
}
