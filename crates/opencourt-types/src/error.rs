//! Error types for the OpenCourt engine.
//!
//! All errors use the `OC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Catalog / input errors
//! - 2xx: Treasury / fund-transfer errors
//! - 3xx: Escrow errors
//! - 4xx: Dispute errors
//! - 5xx: Arbitrator-selection errors
//! - 6xx: Authorization errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, DisputeId, ListingId, PurchaseId};

/// Central error enum for all OpenCourt operations.
///
/// Every error is reported synchronously and terminates the single operation
/// that raised it, leaving engine state unchanged. The engine never retries;
/// retry is the caller's decision.
#[derive(Debug, Error)]
pub enum OpencourtError {
    // =================================================================
    // Catalog / Input Errors (1xx)
    // =================================================================
    /// The referenced listing does not exist in the catalog.
    #[error("OC_ERR_100: Listing not found: {0}")]
    ListingNotFound(ListingId),

    /// Malformed input (empty name, non-positive amount, out-of-bounds value).
    #[error("OC_ERR_101: Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The listing has no remaining stock.
    #[error("OC_ERR_102: Listing out of stock: {0}")]
    OutOfStock(ListingId),

    /// A seller attempted to purchase their own listing.
    #[error("OC_ERR_103: Self-purchase blocked: buyer and seller are the same account")]
    SelfPurchaseBlocked,

    // =================================================================
    // Treasury / Fund-Transfer Errors (2xx)
    // =================================================================
    /// The value-transfer primitive reported failure; nothing was applied.
    #[error("OC_ERR_200: Transfer of {amount} involving account {account} failed: {reason}")]
    TransferFailed {
        account: AccountId,
        amount: Decimal,
        reason: String,
    },

    /// A fund-transferring operation was invoked while another was in flight.
    #[error("OC_ERR_201: Re-entrant call into a fund-transferring operation")]
    ReentrantCall,

    /// Custody-pool conservation invariant violated — critical safety alert.
    #[error("OC_ERR_202: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },

    // =================================================================
    // Escrow Errors (3xx)
    // =================================================================
    /// No custody record exists for this purchase.
    #[error("OC_ERR_300: Escrow not found: {0}")]
    EscrowNotFound(PurchaseId),

    /// The escrow has already been released or disputed.
    #[error("OC_ERR_301: Escrow already settled: {0}")]
    AlreadySettled(PurchaseId),

    /// A custody record with this purchase id already exists.
    #[error("OC_ERR_302: Escrow already exists: {0}")]
    DuplicateEscrow(PurchaseId),

    // =================================================================
    // Dispute Errors (4xx)
    // =================================================================
    /// No dispute exists with this id.
    #[error("OC_ERR_400: Dispute not found: {0}")]
    DisputeNotFound(DisputeId),

    /// The dispute has already reached a verdict; no further votes accepted.
    #[error("OC_ERR_401: Dispute already resolved: {0}")]
    AlreadyResolved(DisputeId),

    /// This arbitrator has already cast a vote in this dispute.
    #[error("OC_ERR_402: Duplicate vote in {dispute_id} by arbitrator {arbitrator}")]
    DuplicateVote {
        dispute_id: DisputeId,
        arbitrator: AccountId,
    },

    // =================================================================
    // Arbitrator-Selection Errors (5xx)
    // =================================================================
    /// The registry holds fewer than the required number of disinterested accounts.
    #[error("OC_ERR_500: Insufficient eligible users: {eligible} eligible, {required} required")]
    InsufficientEligibleUsers { eligible: usize, required: usize },

    // =================================================================
    // Authorization Errors (6xx)
    // =================================================================
    /// Caller is not the required party for this operation.
    #[error("OC_ERR_600: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OC_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpencourtError>;
