//! # Dispute — the vote-based adjudication record
//!
//! A `Dispute` adjudicates a single escrow's disposition through a fixed
//! panel of 3 arbitrators. The first side to reach 2 votes wins; because
//! there are exactly 3 binary voters, resolution occurs no later than the
//! third cast vote and no tie state is reachable.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  2nd vote for either side   ┌──────────────────────┐
//!   │ OPEN ├────────────────────────────▶│ RESOLVED_FOR_{BUYER, │
//!   └──────┘                             │       SELLER}        │
//!                                        └──────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - `buyer_votes + seller_votes ≤ 3` and each arbitrator votes at most once
//!   (the `voters` list is the per-arbitrator has-voted record)
//! - the verdict is set exactly once, the instant either counter reaches 2
//! - after resolution the record is immutable and kept for audit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAJORITY, PANEL_SIZE};
use crate::{AccountId, DisputeId, PurchaseId};

/// The derived lifecycle state of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeStatus {
    /// Votes are still being collected.
    Open,
    /// Buyer majority: the escrow was refunded to the buyer.
    ResolvedForBuyer,
    /// Seller majority: the escrow was paid out to the seller.
    ResolvedForSeller,
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::ResolvedForBuyer => write!(f, "RESOLVED_FOR_BUYER"),
            Self::ResolvedForSeller => write!(f, "RESOLVED_FOR_SELLER"),
        }
    }
}

/// The outcome of a resolved dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The account the escrowed amount was paid to.
    pub winner: AccountId,
    /// Which side the majority favored.
    pub in_favor_of_buyer: bool,
    /// When the second vote landed.
    pub reached_at: DateTime<Utc>,
}

/// A dispute over a single escrow, adjudicated by a drawn panel.
///
/// References its escrow by purchase id, not by ownership; both records can
/// be read concurrently by observers while only engine operations mutate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    /// Unique dispute identifier.
    pub dispute_id: DisputeId,
    /// Back-reference to the escrow under adjudication.
    pub purchase_id: PurchaseId,
    /// The drawn panel, in draw order. Exactly 3 distinct disinterested accounts.
    pub arbitrators: [AccountId; PANEL_SIZE],
    /// Votes favoring the buyer, in `[0, 3]`.
    pub buyer_votes: u8,
    /// Votes favoring the seller, in `[0, 3]`.
    pub seller_votes: u8,
    /// Arbitrators that have voted, in cast order. The dedup record.
    pub voters: Vec<AccountId>,
    /// Set exactly once when either counter reaches 2.
    pub verdict: Option<Verdict>,
    /// When the dispute was opened.
    pub opened_at: DateTime<Utc>,
}

impl Dispute {
    #[must_use]
    pub fn new(
        dispute_id: DisputeId,
        purchase_id: PurchaseId,
        arbitrators: [AccountId; PANEL_SIZE],
    ) -> Self {
        Self {
            dispute_id,
            purchase_id,
            arbitrators,
            buyer_votes: 0,
            seller_votes: 0,
            voters: Vec::with_capacity(PANEL_SIZE),
            verdict: None,
            opened_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_arbitrator(&self, account: &AccountId) -> bool {
        self.arbitrators.contains(account)
    }

    #[must_use]
    pub fn has_voted(&self, account: &AccountId) -> bool {
        self.voters.contains(account)
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.verdict.is_some()
    }

    #[must_use]
    pub fn votes_cast(&self) -> u8 {
        self.buyer_votes + self.seller_votes
    }

    /// Derived state from the verdict.
    #[must_use]
    pub fn status(&self) -> DisputeStatus {
        match self.verdict {
            None => DisputeStatus::Open,
            Some(v) if v.in_favor_of_buyer => DisputeStatus::ResolvedForBuyer,
            Some(_) => DisputeStatus::ResolvedForSeller,
        }
    }

    /// Preconditions for a vote by `arbitrator`, without mutating anything.
    ///
    /// # Errors
    /// `AlreadyResolved` if a verdict exists, `Unauthorized` if the caller is
    /// not on the panel, `DuplicateVote` if the arbitrator already voted.
    pub fn check_vote(&self, arbitrator: &AccountId) -> crate::Result<()> {
        if self.is_resolved() {
            return Err(crate::OpencourtError::AlreadyResolved(self.dispute_id));
        }
        if !self.is_arbitrator(arbitrator) {
            return Err(crate::OpencourtError::Unauthorized {
                reason: format!("{arbitrator} is not an arbitrator of {}", self.dispute_id),
            });
        }
        if self.has_voted(arbitrator) {
            return Err(crate::OpencourtError::DuplicateVote {
                dispute_id: self.dispute_id,
                arbitrator: *arbitrator,
            });
        }
        Ok(())
    }

    /// Whether a vote for the given side would reach the majority threshold.
    #[must_use]
    pub fn would_resolve(&self, in_favor_of_buyer: bool) -> bool {
        let current = if in_favor_of_buyer {
            self.buyer_votes
        } else {
            self.seller_votes
        };
        current + 1 >= MAJORITY
    }

    /// Commit a pre-validated vote. Callers run [`Self::check_vote`] first.
    pub fn record_vote(&mut self, arbitrator: AccountId, in_favor_of_buyer: bool) {
        if in_favor_of_buyer {
            self.buyer_votes += 1;
        } else {
            self.seller_votes += 1;
        }
        self.voters.push(arbitrator);
    }

    /// Set the verdict. Called exactly once, by the dispute manager.
    ///
    /// # Errors
    /// `AlreadyResolved` if a verdict was already set.
    pub fn resolve(&mut self, winner: AccountId, in_favor_of_buyer: bool) -> crate::Result<()> {
        if self.is_resolved() {
            return Err(crate::OpencourtError::AlreadyResolved(self.dispute_id));
        }
        self.verdict = Some(Verdict {
            winner,
            in_favor_of_buyer,
            reached_at: Utc::now(),
        });
        Ok(())
    }
}

/// Dummy dispute for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Dispute {
    /// Create a dummy open dispute over the given panel.
    pub fn dummy(arbitrators: [AccountId; PANEL_SIZE]) -> Self {
        Self::new(
            DisputeId(rand::random::<u32>().into()),
            PurchaseId(rand::random::<u32>().into()),
            arbitrators,
        )
    }
}
