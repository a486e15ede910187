//! Dispute lifecycle — vote collection and verdict execution.
//!
//! Casting the majority-reaching vote settles the dispute in a strict
//! commit order:
//! 1. Validate the vote (existence, panel membership, verdict, dedup)
//! 2. Execute the verdict payout
//! 3. Only then record the vote, set the verdict, debit the loser
//!
//! A payout failure therefore leaves the dispute exactly as it was:
//! the triggering vote is not recorded and can be re-cast once the
//! winner accepts transfers again.

use std::collections::HashMap;

use opencourt_custody::{EscrowLedger, ReputationLedger, Treasury};
use opencourt_types::constants::PANEL_SIZE;
use opencourt_types::{
    AccountId, Dispute, DisputeId, Notice, OpencourtError, PurchaseId, Result,
};

/// Owns every dispute record and drives the vote state machine.
///
/// Dispute records are never destroyed; resolved disputes remain
/// readable as audit records.
pub struct DisputeManager {
    /// All disputes indexed by their id.
    disputes: HashMap<DisputeId, Dispute>,
    /// Next id to assign.
    next_id: DisputeId,
}

impl DisputeManager {
    /// Create a new empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            disputes: HashMap::new(),
            next_id: DisputeId(0),
        }
    }

    /// Materialize a dispute over a purchase with an already-selected
    /// panel. The caller flips the escrow to DISPUTED first; by the time
    /// a dispute record exists, its escrow is committed to arbitration.
    pub fn open(
        &mut self,
        purchase_id: PurchaseId,
        arbitrators: [AccountId; PANEL_SIZE],
    ) -> DisputeId {
        let dispute_id = self.next_id;
        self.next_id = self.next_id.next();
        self.disputes
            .insert(dispute_id, Dispute::new(dispute_id, purchase_id, arbitrators));
        dispute_id
    }

    /// Cast one arbitrator's vote. Returns the verdict notice when this
    /// vote reaches the 2-of-3 majority, `None` otherwise.
    ///
    /// # Errors
    /// - `DisputeNotFound` for an unknown dispute id
    /// - `AlreadyResolved` once a verdict exists
    /// - `Unauthorized` when the caller is not on the panel
    /// - `DuplicateVote` when the caller already voted
    /// - `TransferFailed` when the verdict payout is refused; the vote
    ///   is then not recorded
    pub fn cast_vote(
        &mut self,
        dispute_id: DisputeId,
        caller: AccountId,
        in_favor_of_buyer: bool,
        escrow: &mut EscrowLedger,
        treasury: &mut Treasury,
        reputation: &mut ReputationLedger,
    ) -> Result<Option<Notice>> {
        let dispute = self
            .disputes
            .get_mut(&dispute_id)
            .ok_or(OpencourtError::DisputeNotFound(dispute_id))?;

        // 1. Validate before anything moves
        dispute.check_vote(&caller)?;

        // 2. Majority vote: the payout precedes the commit
        if dispute.would_resolve(in_favor_of_buyer) {
            let (buyer, seller) = {
                let record = escrow
                    .get(dispute.purchase_id)
                    .ok_or(OpencourtError::EscrowNotFound(dispute.purchase_id))?;
                (record.buyer, record.seller)
            };
            let (winner, loser) = if in_favor_of_buyer {
                (buyer, seller)
            } else {
                (seller, buyer)
            };

            let (_, amount) =
                escrow.release_verdict(dispute.purchase_id, in_favor_of_buyer, treasury)?;

            dispute.record_vote(caller, in_favor_of_buyer);
            dispute.resolve(winner, in_favor_of_buyer)?;
            reputation.debit(loser);

            tracing::info!(
                dispute = %dispute_id,
                purchase = %dispute.purchase_id,
                winner = %winner,
                in_favor_of_buyer,
                amount = %amount,
                "Dispute resolved"
            );
            return Ok(Some(Notice::VerdictReached {
                dispute_id,
                winner,
                in_favor_of_buyer,
            }));
        }

        // 3. Minority vote: record only
        dispute.record_vote(caller, in_favor_of_buyer);
        tracing::debug!(
            dispute = %dispute_id,
            arbitrator = %caller,
            in_favor_of_buyer,
            votes_cast = dispute.votes_cast(),
            "Vote recorded"
        );
        Ok(None)
    }

    /// Look up a dispute by id.
    #[must_use]
    pub fn get(&self, dispute_id: DisputeId) -> Option<&Dispute> {
        self.disputes.get(&dispute_id)
    }

    /// Number of disputes ever opened.
    #[must_use]
    pub fn count(&self) -> usize {
        self.disputes.len()
    }
}

impl Default for DisputeManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use opencourt_types::DisputeStatus;
    use rust_decimal::Decimal;

    use super::*;

    fn setup() -> (DisputeManager, EscrowLedger, Treasury, ReputationLedger) {
        (
            DisputeManager::new(),
            EscrowLedger::new(),
            Treasury::new(),
            ReputationLedger::new(),
        )
    }

    /// Fund a buyer, open an escrow, and flip it to DISPUTED.
    fn open_disputed_escrow(
        escrow: &mut EscrowLedger,
        treasury: &mut Treasury,
        amount: Decimal,
    ) -> (PurchaseId, AccountId, AccountId) {
        let buyer = AccountId::new();
        let seller = AccountId::new();
        treasury.deposit(buyer, amount).unwrap();
        treasury.hold(buyer, amount).unwrap();
        let purchase_id = PurchaseId(1);
        escrow.open(purchase_id, buyer, seller, amount).unwrap();
        escrow.mark_disputed(purchase_id, buyer).unwrap();
        (purchase_id, buyer, seller)
    }

    fn make_panel() -> [AccountId; PANEL_SIZE] {
        [AccountId::new(), AccountId::new(), AccountId::new()]
    }

    #[test]
    fn open_assigns_sequential_ids() {
        let (mut dm, _, _, _) = setup();
        let a = dm.open(PurchaseId(1), make_panel());
        let b = dm.open(PurchaseId(2), make_panel());
        assert_eq!(b, a.next());
        assert_eq!(dm.count(), 2);
    }

    #[test]
    fn first_vote_records_without_resolution() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, _, _) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        let notice = dm
            .cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap();
        assert!(notice.is_none());

        let dispute = dm.get(did).unwrap();
        assert_eq!(dispute.votes_cast(), 1);
        assert_eq!(dispute.status(), DisputeStatus::Open);
        // Funds stay in custody until the verdict
        assert_eq!(t.held(), Decimal::TEN);
    }

    #[test]
    fn majority_resolves_and_refunds_buyer() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, buyer, seller) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        dm.cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap();
        let notice = dm
            .cast_vote(did, panel[1], true, &mut el, &mut t, &mut rep)
            .unwrap();

        assert_eq!(
            notice,
            Some(Notice::VerdictReached {
                dispute_id: did,
                winner: buyer,
                in_favor_of_buyer: true,
            })
        );
        assert_eq!(t.balance(buyer), Decimal::TEN);
        assert_eq!(t.held(), Decimal::ZERO);
        assert_eq!(rep.reputation(seller).negative_reviews, 1);
        assert_eq!(rep.reputation(buyer).negative_reviews, 0);

        let dispute = dm.get(did).unwrap();
        assert_eq!(dispute.status(), DisputeStatus::ResolvedForBuyer);
        assert_eq!(dispute.votes_cast(), 2);
    }

    #[test]
    fn majority_for_seller_pays_seller() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, buyer, seller) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        dm.cast_vote(did, panel[0], false, &mut el, &mut t, &mut rep)
            .unwrap();
        let notice = dm
            .cast_vote(did, panel[1], false, &mut el, &mut t, &mut rep)
            .unwrap();

        assert!(matches!(
            notice,
            Some(Notice::VerdictReached { winner, in_favor_of_buyer: false, .. }) if winner == seller
        ));
        assert_eq!(t.balance(seller), Decimal::TEN);
        assert_eq!(rep.reputation(buyer).negative_reviews, 1);
        assert_eq!(
            dm.get(did).unwrap().status(),
            DisputeStatus::ResolvedForSeller
        );
    }

    #[test]
    fn split_then_third_vote_resolves() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, buyer, _) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        assert!(dm
            .cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap()
            .is_none());
        assert!(dm
            .cast_vote(did, panel[1], false, &mut el, &mut t, &mut rep)
            .unwrap()
            .is_none());
        // Third vote breaks the 1-1 tie
        let notice = dm
            .cast_vote(did, panel[2], true, &mut el, &mut t, &mut rep)
            .unwrap();
        assert!(notice.is_some());

        let dispute = dm.get(did).unwrap();
        assert_eq!(dispute.votes_cast(), 3);
        assert_eq!(dispute.status(), DisputeStatus::ResolvedForBuyer);
        assert_eq!(t.balance(buyer), Decimal::TEN);
    }

    #[test]
    fn non_arbitrator_vote_unauthorized() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, _, _) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let did = dm.open(pid, make_panel());

        let outsider = AccountId::new();
        let err = dm
            .cast_vote(did, outsider, true, &mut el, &mut t, &mut rep)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::Unauthorized { .. }));

        let dispute = dm.get(did).unwrap();
        assert_eq!(dispute.votes_cast(), 0);
        assert_eq!(dispute.buyer_votes, 0);
        assert_eq!(dispute.seller_votes, 0);
    }

    #[test]
    fn duplicate_vote_rejected() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, _, _) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        dm.cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap();
        let err = dm
            .cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap_err();
        assert!(matches!(
            err,
            OpencourtError::DuplicateVote { arbitrator, .. } if arbitrator == panel[0]
        ));
        assert_eq!(dm.get(did).unwrap().votes_cast(), 1);
    }

    #[test]
    fn vote_after_resolution_rejected() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, _, _) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        dm.cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap();
        dm.cast_vote(did, panel[1], true, &mut el, &mut t, &mut rep)
            .unwrap();

        let err = dm
            .cast_vote(did, panel[2], false, &mut el, &mut t, &mut rep)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::AlreadyResolved(d) if d == did));
        // The late vote changes nothing
        assert_eq!(dm.get(did).unwrap().votes_cast(), 2);
    }

    #[test]
    fn unknown_dispute_not_found() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let err = dm
            .cast_vote(DisputeId(404), AccountId::new(), true, &mut el, &mut t, &mut rep)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::DisputeNotFound(_)));
    }

    #[test]
    fn failed_payout_leaves_dispute_open() {
        let (mut dm, mut el, mut t, mut rep) = setup();
        let (pid, buyer, seller) = open_disputed_escrow(&mut el, &mut t, Decimal::TEN);
        let panel = make_panel();
        let did = dm.open(pid, panel);

        dm.cast_vote(did, panel[0], true, &mut el, &mut t, &mut rep)
            .unwrap();

        // The would-be winner refuses the refund
        t.suspend(buyer);
        let err = dm
            .cast_vote(did, panel[1], true, &mut el, &mut t, &mut rep)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::TransferFailed { .. }));

        // The triggering vote was not recorded; the dispute is still open
        let dispute = dm.get(did).unwrap();
        assert_eq!(dispute.votes_cast(), 1);
        assert_eq!(dispute.status(), DisputeStatus::Open);
        assert!(!dispute.has_voted(&panel[1]));
        assert_eq!(t.held(), Decimal::TEN);
        assert_eq!(rep.reputation(seller).negative_reviews, 0);

        // Same arbitrator re-casts after the winner is reinstated
        t.reinstate(buyer);
        let notice = dm
            .cast_vote(did, panel[1], true, &mut el, &mut t, &mut rep)
            .unwrap();
        assert!(notice.is_some());
        assert_eq!(t.balance(buyer), Decimal::TEN);
        assert_eq!(rep.reputation(seller).negative_reviews, 1);
    }
}
