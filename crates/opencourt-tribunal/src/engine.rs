//! Market engine — the single entry point wiring every plane together.
//!
//! The engine owns all stores; operations take `&mut self`, which
//! serializes callers (one global critical section, acceptable at the
//! volumes this engine targets). Fund-transferring operations
//! additionally run inside the [`TransferGuard`], so a nested call
//! fails with `ReentrantCall` instead of deadlocking.
//!
//! ## Operation Flow
//!
//! ```text
//! list_product → Catalog.list() → UserRegistry.add(seller)
//! purchase     → Treasury.hold() → Catalog.reserve_unit()
//!              → UserRegistry.add(buyer) → EscrowLedger.open()
//! confirm      → [guard] EscrowLedger.confirm_delivery()
//! open_dispute → select_panel() → EscrowLedger.mark_disputed()
//!              → DisputeManager.open()
//! cast_vote    → [guard] DisputeManager.cast_vote()
//! ```
//!
//! Every mutating operation appends its notification to the in-order
//! notice log on success.

use opencourt_custody::{
    Catalog, EscrowLedger, ReputationLedger, TransferGuard, Treasury, UserRegistry,
};
use opencourt_panel::{EntropySource, SystemEntropy, select_panel};
use opencourt_types::{
    AccountId, Dispute, DisputeId, EngineConfig, Escrow, Listing, ListingId, Notice,
    OpencourtError, PurchaseId, Reputation, Result,
};
use rust_decimal::Decimal;

use crate::dispute_manager::DisputeManager;

/// Owns every component of the escrow-and-arbitration engine.
///
/// Generic over the entropy source so tests and replay tooling can pin
/// panel selection with a fixed seed.
pub struct MarketEngine<E: EntropySource = SystemEntropy> {
    treasury: Treasury,
    registry: UserRegistry,
    guard: TransferGuard,
    catalog: Catalog,
    escrow: EscrowLedger,
    reputation: ReputationLedger,
    disputes: DisputeManager,
    entropy: E,
    /// Next purchase id to assign.
    next_purchase_id: PurchaseId,
    /// Append-only notification log, in operation order.
    notices: Vec<Notice>,
}

impl MarketEngine<SystemEntropy> {
    /// Create an engine with production entropy.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_entropy(config, SystemEntropy)
    }
}

impl Default for MarketEngine<SystemEntropy> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<E: EntropySource> MarketEngine<E> {
    /// Create an engine with a caller-supplied entropy source.
    #[must_use]
    pub fn with_entropy(config: EngineConfig, entropy: E) -> Self {
        Self {
            treasury: Treasury::new(),
            registry: UserRegistry::new(),
            guard: TransferGuard::new(),
            catalog: Catalog::new(config.catalog),
            escrow: EscrowLedger::new(),
            reputation: ReputationLedger::new(),
            disputes: DisputeManager::new(),
            entropy,
            next_purchase_id: PurchaseId(0),
            notices: Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Treasury surface
    // -----------------------------------------------------------------

    /// Fund an account from outside the engine.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a non-positive amount.
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        self.treasury.deposit(account, amount)
    }

    /// Make an account refuse payouts (models a failing transfer leg).
    pub fn suspend_account(&mut self, account: AccountId) {
        self.treasury.suspend(account);
    }

    /// Allow payouts to a suspended account again.
    pub fn reinstate_account(&mut self, account: AccountId) {
        self.treasury.reinstate(account);
    }

    // -----------------------------------------------------------------
    // Marketplace operations
    // -----------------------------------------------------------------

    /// Validate and store a listing. The seller joins the registry.
    ///
    /// # Errors
    /// Returns `InvalidInput` when the listing violates the configured
    /// bounds; the seller is then not registered.
    pub fn list_product(
        &mut self,
        seller: AccountId,
        name: &str,
        price: Decimal,
        quantity: u32,
    ) -> Result<ListingId> {
        let listing_id = self.catalog.list(seller, name, price, quantity)?;
        self.registry.add(seller);
        tracing::info!(
            listing = %listing_id,
            seller = %seller,
            price = %price,
            quantity,
            "Product listed"
        );
        Ok(listing_id)
    }

    /// Buy one unit of a listing: hold the price in custody and open
    /// the escrow. Emits `PurchaseOpened`.
    ///
    /// Ordering is validate-first: every precondition is checked against
    /// reads, the treasury hold is the first mutation, and the stock
    /// decrement and record insertions follow only after it succeeds.
    ///
    /// # Errors
    /// - `ListingNotFound` / `OutOfStock` for a missing or sold-out listing
    /// - `SelfPurchaseBlocked` when the buyer is the seller
    /// - `TransferFailed` when the buyer cannot cover the price
    pub fn purchase(&mut self, listing_id: ListingId, buyer: AccountId) -> Result<PurchaseId> {
        let (seller, price) = {
            let listing = self
                .catalog
                .get(listing_id)
                .ok_or(OpencourtError::ListingNotFound(listing_id))?;
            if !listing.in_stock() {
                return Err(OpencourtError::OutOfStock(listing_id));
            }
            (listing.seller, listing.price)
        };
        if buyer == seller {
            return Err(OpencourtError::SelfPurchaseBlocked);
        }

        // First mutation. Fails atomically on insufficient funds.
        self.treasury.hold(buyer, price)?;
        // Cannot fail: existence and stock were checked above and no
        // other operation ran since.
        let _ = self.catalog.reserve_unit(listing_id)?;
        self.registry.add(buyer);

        let purchase_id = self.next_purchase_id;
        self.next_purchase_id = self.next_purchase_id.next();
        let notice = self.escrow.open(purchase_id, buyer, seller, price)?;
        self.notices.push(notice);

        tracing::info!(
            purchase = %purchase_id,
            listing = %listing_id,
            buyer = %buyer,
            amount = %price,
            "Purchase opened"
        );
        Ok(purchase_id)
    }

    /// Confirm delivery of a purchase: pay the seller and release the
    /// escrow. Buyer-only. Emits `DeliveryConfirmed`.
    ///
    /// # Errors
    /// - `ReentrantCall` when another fund transfer is in flight
    /// - `EscrowNotFound` / `Unauthorized` / `AlreadySettled` per the ledger
    /// - `TransferFailed` when the seller refuses the payout; state is
    ///   unchanged and the call can be retried
    pub fn confirm_delivery(&mut self, purchase_id: PurchaseId, caller: AccountId) -> Result<()> {
        self.guard.enter()?;
        let result = self.escrow.confirm_delivery(
            purchase_id,
            caller,
            &mut self.treasury,
            &mut self.reputation,
        );
        self.guard.exit();

        let notice = result?;
        self.notices.push(notice);
        tracing::info!(purchase = %purchase_id, "Delivery confirmed");
        Ok(())
    }

    /// Open a dispute over a held purchase. Buyer-only. Draws a seed,
    /// selects the panel, and only then flips the escrow to DISPUTED —
    /// a failed selection leaves no trace. Emits `DisputeOpened`.
    ///
    /// # Errors
    /// - `EscrowNotFound` / `Unauthorized` / `AlreadySettled` per the ledger
    /// - `InsufficientEligibleUsers` when fewer than three registry
    ///   members are disinterested; no record is created
    pub fn open_dispute(&mut self, purchase_id: PurchaseId, caller: AccountId) -> Result<DisputeId> {
        let (buyer, seller) = {
            let escrow = self
                .escrow
                .get(purchase_id)
                .ok_or(OpencourtError::EscrowNotFound(purchase_id))?;
            if caller != escrow.buyer {
                return Err(OpencourtError::Unauthorized {
                    reason: format!("{caller} is not the buyer of {purchase_id}"),
                });
            }
            if escrow.is_settled() {
                return Err(OpencourtError::AlreadySettled(purchase_id));
            }
            (escrow.buyer, escrow.seller)
        };

        let seed = self.entropy.draw_seed(caller);
        let panel = select_panel(seed, self.registry.members(), buyer, seller)?;

        // Selection succeeded; the state changes now commit together.
        self.escrow.mark_disputed(purchase_id, caller)?;
        let dispute_id = self.disputes.open(purchase_id, panel);
        self.notices.push(Notice::DisputeOpened { purchase_id, buyer });

        tracing::info!(
            dispute = %dispute_id,
            purchase = %purchase_id,
            seed = hex::encode(seed.to_le_bytes()),
            "Dispute opened"
        );
        Ok(dispute_id)
    }

    /// Cast an arbitrator's vote on a dispute. Emits `VerdictReached`
    /// when the vote settles the dispute.
    ///
    /// # Errors
    /// - `ReentrantCall` when another fund transfer is in flight
    /// - `DisputeNotFound` / `AlreadyResolved` / `Unauthorized` /
    ///   `DuplicateVote` per the dispute manager
    /// - `TransferFailed` when the verdict payout is refused; the vote
    ///   is not recorded
    pub fn cast_vote(
        &mut self,
        dispute_id: DisputeId,
        caller: AccountId,
        in_favor_of_buyer: bool,
    ) -> Result<()> {
        self.guard.enter()?;
        let result = self.disputes.cast_vote(
            dispute_id,
            caller,
            in_favor_of_buyer,
            &mut self.escrow,
            &mut self.treasury,
            &mut self.reputation,
        );
        self.guard.exit();

        if let Some(notice) = result? {
            self.notices.push(notice);
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Read-only queries (immediately consistent)
    // -----------------------------------------------------------------

    /// Custody record for a purchase.
    #[must_use]
    pub fn escrow(&self, purchase_id: PurchaseId) -> Option<&Escrow> {
        self.escrow.get(purchase_id)
    }

    /// Dispute record by id.
    #[must_use]
    pub fn dispute(&self, dispute_id: DisputeId) -> Option<&Dispute> {
        self.disputes.get(dispute_id)
    }

    /// Reputation counters for an account (zero for unknown accounts).
    #[must_use]
    pub fn reputation(&self, account: AccountId) -> Reputation {
        self.reputation.reputation(account)
    }

    /// Spendable balance for an account.
    #[must_use]
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.treasury.balance(account)
    }

    /// Funds currently in the custody pool.
    #[must_use]
    pub fn held(&self) -> Decimal {
        self.treasury.held()
    }

    /// Listing by id.
    #[must_use]
    pub fn listing(&self, listing_id: ListingId) -> Option<&Listing> {
        self.catalog.get(listing_id)
    }

    /// Number of distinct accounts that ever listed or purchased.
    #[must_use]
    pub fn registered_users(&self) -> usize {
        self.registry.len()
    }

    /// Registry members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[AccountId] {
        self.registry.members()
    }

    /// The notification log, in operation order.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Check the treasury conservation invariant.
    ///
    /// # Errors
    /// Returns `CustodyInvariantViolation` if the books do not balance.
    pub fn verify_conservation(&self) -> Result<()> {
        self.treasury.verify_conservation()
    }
}
