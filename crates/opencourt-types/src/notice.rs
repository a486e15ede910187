//! Notification records emitted by the engine.
//!
//! Every successful mutating operation emits exactly one `Notice` with the
//! fields external observers (indexers, UIs) need. Notices are appended to
//! an in-order log owned by the engine; they are never emitted for failed
//! operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, DisputeId, PurchaseId};

/// A structured notification record, one variant per observable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// A purchase was opened and funds entered custody.
    PurchaseOpened {
        purchase_id: PurchaseId,
        buyer: AccountId,
        amount: Decimal,
    },
    /// The buyer confirmed delivery and the seller was paid.
    DeliveryConfirmed {
        purchase_id: PurchaseId,
        seller: AccountId,
        amount: Decimal,
    },
    /// The buyer opened a dispute and a panel was drawn.
    DisputeOpened {
        purchase_id: PurchaseId,
        buyer: AccountId,
    },
    /// A dispute reached its majority verdict and the winner was paid.
    VerdictReached {
        dispute_id: DisputeId,
        winner: AccountId,
        in_favor_of_buyer: bool,
    },
}

impl Notice {
    /// Stable machine-readable kind tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PurchaseOpened { .. } => "PURCHASE_OPENED",
            Self::DeliveryConfirmed { .. } => "DELIVERY_CONFIRMED",
            Self::DisputeOpened { .. } => "DISPUTE_OPENED",
            Self::VerdictReached { .. } => "VERDICT_REACHED",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
