//! Product catalog — listing validation and stock reservation.
//!
//! The catalog is the hard gate for sellers: every listing is validated
//! against the configured bounds before it is stored. The purchase path
//! reserves stock one unit at a time.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: if any check fails, the listing is rejected
//! - **Validate here, not in the record**: [`Listing`] itself carries no
//!   validation logic

use std::collections::HashMap;

use opencourt_types::{
    AccountId, CatalogLimits, Listing, ListingId, OpencourtError, Result,
};
use rust_decimal::Decimal;

/// Validated listing store with sequential ids.
pub struct Catalog {
    /// All listings indexed by their id.
    listings: HashMap<ListingId, Listing>,
    /// Next id to assign.
    next_id: ListingId,
    /// Validation bounds for new listings.
    limits: CatalogLimits,
}

impl Catalog {
    /// Create a new empty catalog with the given bounds.
    #[must_use]
    pub fn new(limits: CatalogLimits) -> Self {
        Self {
            listings: HashMap::new(),
            next_id: ListingId(0),
            limits,
        }
    }

    /// Validate and store a new listing. Returns the assigned id.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty or oversized name, a
    /// non-positive or over-limit price, or a zero or over-limit quantity.
    pub fn list(
        &mut self,
        seller: AccountId,
        name: &str,
        price: Decimal,
        quantity: u32,
    ) -> Result<ListingId> {
        // 1. Name checks
        if name.is_empty() {
            return Err(OpencourtError::InvalidInput {
                reason: "Listing name must not be empty".to_string(),
            });
        }
        if name.len() > self.limits.max_name_length {
            return Err(OpencourtError::InvalidInput {
                reason: format!(
                    "Listing name length {} exceeds maximum {}",
                    name.len(),
                    self.limits.max_name_length,
                ),
            });
        }

        // 2. Price checks
        if price.is_zero() || price.is_sign_negative() {
            return Err(OpencourtError::InvalidInput {
                reason: "Price must be positive".to_string(),
            });
        }
        if price > self.limits.max_price {
            return Err(OpencourtError::InvalidInput {
                reason: format!("Price {price} exceeds maximum {}", self.limits.max_price),
            });
        }

        // 3. Quantity checks
        if quantity == 0 {
            return Err(OpencourtError::InvalidInput {
                reason: "Quantity must be positive".to_string(),
            });
        }
        if quantity > self.limits.max_quantity {
            return Err(OpencourtError::InvalidInput {
                reason: format!(
                    "Quantity {quantity} exceeds maximum {}",
                    self.limits.max_quantity,
                ),
            });
        }

        let id = self.next_id;
        self.next_id = self.next_id.next();
        self.listings
            .insert(id, Listing::new(id, seller, name, price, quantity));
        Ok(id)
    }

    /// Decrement a listing's stock by one unit and return its
    /// (seller, price) pair for the purchase being opened.
    ///
    /// # Errors
    /// - `ListingNotFound` for an unknown id
    /// - `OutOfStock` when no units remain
    pub fn reserve_unit(&mut self, listing_id: ListingId) -> Result<(AccountId, Decimal)> {
        let listing = self
            .listings
            .get_mut(&listing_id)
            .ok_or(OpencourtError::ListingNotFound(listing_id))?;

        if listing.quantity == 0 {
            return Err(OpencourtError::OutOfStock(listing_id));
        }

        listing.quantity -= 1;
        Ok((listing.seller, listing.price))
    }

    /// Look up a listing by id.
    #[must_use]
    pub fn get(&self, listing_id: ListingId) -> Option<&Listing> {
        self.listings.get(&listing_id)
    }

    /// Number of listings ever stored (sold-out listings included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the catalog holds no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogLimits::default())
    }
}
