//! Shared types for the OpenCourt escrow-and-arbitration engine.
//!
//! This crate defines the vocabulary used across all OpenCourt crates:
//! identifiers ([`AccountId`], [`PurchaseId`], [`DisputeId`], [`ListingId`]),
//! custody records ([`Escrow`], [`Listing`]), arbitration records
//! ([`Dispute`], [`Verdict`]), reputation counters ([`Reputation`]),
//! engine notifications ([`Notice`]) and the error taxonomy
//! ([`OpencourtError`]).
//!
//! Everything here is a plain value type: no I/O, no locks, no clocks
//! beyond timestamping at construction. Higher crates own the stores.

pub mod config;
pub mod constants;
pub mod dispute;
pub mod error;
pub mod escrow;
pub mod ids;
pub mod listing;
pub mod notice;
pub mod reputation;

pub use config::*;
pub use dispute::*;
pub use error::*;
pub use escrow::*;
pub use ids::*;
pub use listing::*;
pub use notice::*;
pub use reputation::*;

// Constants are accessed via `opencourt_types::constants::FOO` (not
// re-exported to avoid name collisions).
