//! Identifiers used throughout OpenCourt.
//!
//! Account identities use UUIDv7 for time-ordered lexicographic sorting;
//! record identifiers (`PurchaseId`, `DisputeId`, `ListingId`) are plain
//! sequential counters assigned by the component that owns the record.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Opaque identity of a participant (buyer, seller, or arbitrator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PurchaseId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for a purchase / escrow record.
///
/// Assigned by the purchase operation, one per custody record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PurchaseId(pub u64);

impl PurchaseId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "purchase:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DisputeId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for a dispute proceeding.
///
/// Assigned by the dispute manager when a dispute is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DisputeId(pub u64);

impl DisputeId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DisputeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispute:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ListingId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for a catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ListingId(pub u64);

impl ListingId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
