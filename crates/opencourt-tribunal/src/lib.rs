//! # opencourt-tribunal
//!
//! **Finality Plane** for the OpenCourt engine. Everything that turns a
//! held escrow into a final outcome lives here:
//!
//! 1. **Dispute manager** — dispute records, vote validation, 2-of-3
//!    majority verdicts, and the verdict payout.
//! 2. **Market engine** — the facade that wires custody, panel
//!    selection, and dispute resolution into the public operations.
//!
//! ## Dispute Flow
//!
//! ```text
//!   open_dispute ──▶ select_panel ──▶ DisputeManager.open
//!                                          │
//!   cast_vote ──▶ check_vote ──▶ majority? ─┤
//!                                  │ no     │ yes
//!                                  ▼        ▼
//!                             record vote  payout ▶ resolve ▶ notice
//! ```
//!
//! The engine is the only writer; all stores are owned by
//! [`MarketEngine`] and reached through `&mut self`.

pub mod dispute_manager;
pub mod engine;

pub use dispute_manager::DisputeManager;
pub use engine::MarketEngine;
