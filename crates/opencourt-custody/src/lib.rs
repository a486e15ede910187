//! # opencourt-custody
//!
//! **Custody Plane**: treasury balances, user registration, listing
//! validation, escrow custody, and reputation bookkeeping.
//!
//! ## Architecture
//!
//! The custody plane owns every store the engine mutates:
//! 1. **Treasury**: spendable balances plus the custody pool; the value-transfer primitive
//! 2. **UserRegistry**: append-only account set — the panel-selection universe
//! 3. **TransferGuard**: single-admission lock around fund transfers
//! 4. **Catalog**: validated listings and per-unit stock reservation
//! 5. **EscrowLedger**: custody records and their settlement paths
//! 6. **ReputationLedger**: monotonic review counters
//!
//! ## Settlement Flow
//!
//! ```text
//! purchase → Treasury.hold() → EscrowLedger.open()
//!          → confirm_delivery → Treasury.release(seller) → Reputation.credit()
//!          → open_dispute     → EscrowLedger.mark_disputed() → (verdict decides payout)
//! ```
//!
//! Every payout runs **before** the record flips state, so a transfer
//! failure is always retryable.

pub mod catalog;
pub mod escrow_ledger;
pub mod registry;
pub mod reputation_ledger;
pub mod transfer_guard;
pub mod treasury;

pub use catalog::Catalog;
pub use escrow_ledger::EscrowLedger;
pub use registry::UserRegistry;
pub use reputation_ledger::ReputationLedger;
pub use transfer_guard::TransferGuard;
pub use treasury::Treasury;
