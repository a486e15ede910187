//! # opencourt-panel
//!
//! **Pure deterministic arbitrator selection for OpenCourt.**
//!
//! The selection plane takes a registry snapshot and a seed and produces
//! a panel of three disinterested arbitrators. It has:
//!
//! - **Zero side effects**: no stores, no clocks inside the selector
//! - **Deterministic output**: same seed + same registry -> same panel, same order
//! - **Fail-fast eligibility**: impossible selections error instead of looping
//! - **Pluggable entropy**: production and fixed sources behind one trait

pub mod entropy;
pub mod selector;

pub use entropy::{EntropySource, FixedEntropy, SystemEntropy};
pub use selector::{eligible_count, select_panel};
