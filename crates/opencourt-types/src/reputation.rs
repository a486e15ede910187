//! Per-account reputation counters.
//!
//! Two monotonic tallies: confirmed-good outcomes and lost-dispute outcomes.
//! No aggregation, decay, or weighting lives here; a "score" is whatever the
//! caller computes from the two raw counters.

use serde::{Deserialize, Serialize};

/// Monotonic win/loss record for one account.
///
/// Counters never decrease and are never reset. Written only by the escrow
/// ledger (confirmed delivery) and the dispute manager (verdict).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation {
    /// Confirmed deliveries as seller.
    pub positive_reviews: u64,
    /// Lost disputes.
    pub negative_reviews: u64,
}

impl Reputation {
    /// Record a positive outcome.
    pub fn credit(&mut self) {
        self.positive_reviews = self.positive_reviews.saturating_add(1);
    }

    /// Record a negative outcome.
    pub fn debit(&mut self) {
        self.negative_reviews = self.negative_reviews.saturating_add(1);
    }

    #[must_use]
    pub fn total_reviews(&self) -> u64 {
        self.positive_reviews.saturating_add(self.negative_reviews)
    }
}
