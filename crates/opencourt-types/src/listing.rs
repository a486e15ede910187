//! Catalog listing record.
//!
//! Listings belong to the catalog collaborator, not to the escrow core; the
//! purchase path only reads the seller and price and decrements stock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, ListingId};

/// A priced product listing with remaining stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    /// The account paid when a purchase of this listing is confirmed.
    pub seller: AccountId,
    pub name: String,
    /// Unit price in the native value unit.
    pub price: Decimal,
    /// Remaining stock. Decremented by one per purchase.
    pub quantity: u32,
    pub listed_at: DateTime<Utc>,
}

impl Listing {
    #[must_use]
    pub fn new(
        id: ListingId,
        seller: AccountId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            seller,
            name: name.into(),
            price,
            quantity,
            listed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Listing[{}] {} @ {} ({} left)",
            self.id, self.name, self.price, self.quantity
        )
    }
}
