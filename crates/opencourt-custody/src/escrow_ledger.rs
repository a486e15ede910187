//! Escrow ledger — opens custody records and settles them.
//!
//! The EscrowLedger owns every [`Escrow`] and is the only writer of
//! their flags. Settlement is atomic: the treasury payout happens
//! first, and a transfer failure leaves every record untouched so the
//! caller can retry.

use std::collections::HashMap;

use opencourt_types::{
    AccountId, Escrow, Notice, OpencourtError, PurchaseId, Result,
};
use rust_decimal::Decimal;

use crate::{reputation_ledger::ReputationLedger, treasury::Treasury};

/// Owns the custody records and drives their lifecycle.
pub struct EscrowLedger {
    /// All custody records indexed by purchase id.
    escrows: HashMap<PurchaseId, Escrow>,
}

impl EscrowLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            escrows: HashMap::new(),
        }
    }

    /// Open a custody record for a purchase whose funds are already in
    /// the treasury pool. Party and amount validation belongs to the
    /// purchase operation; the ledger only guards id uniqueness.
    ///
    /// # Errors
    /// Returns `DuplicateEscrow` if a record with this id already exists.
    pub fn open(
        &mut self,
        purchase_id: PurchaseId,
        buyer: AccountId,
        seller: AccountId,
        amount: Decimal,
    ) -> Result<Notice> {
        if self.escrows.contains_key(&purchase_id) {
            return Err(OpencourtError::DuplicateEscrow(purchase_id));
        }
        self.escrows
            .insert(purchase_id, Escrow::new(purchase_id, buyer, seller, amount));
        Ok(Notice::PurchaseOpened {
            purchase_id,
            buyer,
            amount,
        })
    }

    /// Confirm delivery: pay the seller out of custody, mark the escrow
    /// RELEASED, and credit the seller's reputation.
    ///
    /// 1. Only the buyer may confirm
    /// 2. A settled escrow (released or disputed) rejects the call
    /// 3. The payout runs before any record changes — if the transfer
    ///    fails, the escrow stays HELD and confirm can be retried
    ///
    /// # Errors
    /// - `EscrowNotFound` for an unknown purchase id
    /// - `Unauthorized` when the caller is not the buyer
    /// - `AlreadySettled` when the escrow was released or disputed
    /// - `TransferFailed` when the seller refuses the payout
    pub fn confirm_delivery(
        &mut self,
        purchase_id: PurchaseId,
        caller: AccountId,
        treasury: &mut Treasury,
        reputation: &mut ReputationLedger,
    ) -> Result<Notice> {
        let escrow = self
            .escrows
            .get_mut(&purchase_id)
            .ok_or(OpencourtError::EscrowNotFound(purchase_id))?;

        if caller != escrow.buyer {
            tracing::warn!(
                purchase = %purchase_id,
                caller = %caller,
                "Confirm-delivery attempt by non-buyer"
            );
            return Err(OpencourtError::Unauthorized {
                reason: format!("{caller} is not the buyer of {purchase_id}"),
            });
        }
        if escrow.is_settled() {
            return Err(OpencourtError::AlreadySettled(purchase_id));
        }

        // Payout first — a failure here must leave the escrow HELD.
        treasury.release(escrow.seller, escrow.amount)?;

        escrow.mark_released()?;
        reputation.credit(escrow.seller);

        Ok(Notice::DeliveryConfirmed {
            purchase_id,
            seller: escrow.seller,
            amount: escrow.amount,
        })
    }

    /// Flip an escrow to DISPUTED. Funds stay in custody; the eventual
    /// payout side is decided by the dispute's verdict.
    ///
    /// The caller invokes this only after a panel was successfully
    /// drawn, so a selection failure leaves the escrow untouched.
    ///
    /// # Errors
    /// - `EscrowNotFound` for an unknown purchase id
    /// - `Unauthorized` when the caller is not the buyer
    /// - `AlreadySettled` when the escrow was released or disputed
    pub fn mark_disputed(&mut self, purchase_id: PurchaseId, caller: AccountId) -> Result<()> {
        let escrow = self
            .escrows
            .get_mut(&purchase_id)
            .ok_or(OpencourtError::EscrowNotFound(purchase_id))?;

        if caller != escrow.buyer {
            tracing::warn!(
                purchase = %purchase_id,
                caller = %caller,
                "Dispute attempt by non-buyer"
            );
            return Err(OpencourtError::Unauthorized {
                reason: format!("{caller} is not the buyer of {purchase_id}"),
            });
        }
        escrow.mark_disputed()
    }

    /// Pay a disputed escrow out to the verdict's winner (buyer refund
    /// or seller payout). Returns the winner and the amount moved so the
    /// dispute record can carry them.
    ///
    /// The escrow's flags are left as they are: `disputed` stays set and
    /// the dispute's verdict records the disposition.
    ///
    /// # Errors
    /// - `EscrowNotFound` for an unknown purchase id
    /// - `Internal` if the escrow is not in the DISPUTED state
    /// - `TransferFailed` when the winner refuses the payout; the caller
    ///   must then abort the resolution
    pub fn release_verdict(
        &mut self,
        purchase_id: PurchaseId,
        in_favor_of_buyer: bool,
        treasury: &mut Treasury,
    ) -> Result<(AccountId, Decimal)> {
        let escrow = self
            .escrows
            .get(&purchase_id)
            .ok_or(OpencourtError::EscrowNotFound(purchase_id))?;

        if !escrow.disputed || escrow.released {
            return Err(OpencourtError::Internal(format!(
                "verdict payout requested for {purchase_id} in state {}",
                escrow.state(),
            )));
        }

        let winner = if in_favor_of_buyer {
            escrow.buyer
        } else {
            escrow.seller
        };
        treasury.release(winner, escrow.amount)?;
        Ok((winner, escrow.amount))
    }

    /// Look up a custody record by purchase id.
    #[must_use]
    pub fn get(&self, purchase_id: PurchaseId) -> Option<&Escrow> {
        self.escrows.get(&purchase_id)
    }

    /// Number of custody records ever opened.
    #[must_use]
    pub fn count(&self) -> usize {
        self.escrows.len()
    }
}

impl Default for EscrowLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use opencourt_types::EscrowState;

    use super::*;

    fn setup() -> (EscrowLedger, Treasury, ReputationLedger) {
        (EscrowLedger::new(), Treasury::new(), ReputationLedger::new())
    }

    /// Fund a buyer, hold the amount, and open an escrow for it.
    fn open_funded(
        ledger: &mut EscrowLedger,
        treasury: &mut Treasury,
        amount: Decimal,
    ) -> (PurchaseId, AccountId, AccountId) {
        let buyer = AccountId::new();
        let seller = AccountId::new();
        treasury.deposit(buyer, amount).unwrap();
        treasury.hold(buyer, amount).unwrap();
        let purchase_id = PurchaseId(1);
        ledger.open(purchase_id, buyer, seller, amount).unwrap();
        (purchase_id, buyer, seller)
    }

    #[test]
    fn open_creates_held_escrow() {
        let (mut ledger, mut treasury, _) = setup();
        let amount = Decimal::new(50, 0);
        let (pid, buyer, _) = open_funded(&mut ledger, &mut treasury, amount);

        let escrow = ledger.get(pid).unwrap();
        assert_eq!(escrow.state(), EscrowState::Held);
        assert_eq!(escrow.buyer, buyer);
        assert_eq!(escrow.amount, amount);
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn open_notice_carries_purchase_fields() {
        let (mut ledger, _, _) = setup();
        let buyer = AccountId::new();
        let notice = ledger
            .open(PurchaseId(7), buyer, AccountId::new(), Decimal::TEN)
            .unwrap();
        assert_eq!(
            notice,
            Notice::PurchaseOpened {
                purchase_id: PurchaseId(7),
                buyer,
                amount: Decimal::TEN,
            }
        );
    }

    #[test]
    fn duplicate_open_fails() {
        let (mut ledger, _, _) = setup();
        let pid = PurchaseId(3);
        ledger
            .open(pid, AccountId::new(), AccountId::new(), Decimal::ONE)
            .unwrap();
        let err = ledger
            .open(pid, AccountId::new(), AccountId::new(), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::DuplicateEscrow(i) if i == pid));
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn confirm_pays_seller_and_credits_reputation() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let amount = Decimal::new(80, 0);
        let (pid, buyer, seller) = open_funded(&mut ledger, &mut treasury, amount);

        let notice = ledger
            .confirm_delivery(pid, buyer, &mut treasury, &mut reputation)
            .unwrap();

        assert_eq!(
            notice,
            Notice::DeliveryConfirmed {
                purchase_id: pid,
                seller,
                amount,
            }
        );
        assert_eq!(treasury.balance(seller), amount);
        assert_eq!(treasury.held(), Decimal::ZERO);
        assert_eq!(ledger.get(pid).unwrap().state(), EscrowState::Released);
        assert_eq!(reputation.reputation(seller).positive_reviews, 1);
    }

    #[test]
    fn confirm_by_non_buyer_unauthorized() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let (pid, _, seller) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        let intruder = AccountId::new();
        let err = ledger
            .confirm_delivery(pid, intruder, &mut treasury, &mut reputation)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::Unauthorized { .. }));

        // Nothing moved, nothing credited
        assert_eq!(ledger.get(pid).unwrap().state(), EscrowState::Held);
        assert_eq!(treasury.held(), Decimal::TEN);
        assert_eq!(reputation.reputation(seller).positive_reviews, 0);
    }

    #[test]
    fn seller_cannot_confirm_own_delivery() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let (pid, _, seller) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        let err = ledger
            .confirm_delivery(pid, seller, &mut treasury, &mut reputation)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::Unauthorized { .. }));
    }

    #[test]
    fn second_confirm_already_settled() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let (pid, buyer, seller) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        ledger
            .confirm_delivery(pid, buyer, &mut treasury, &mut reputation)
            .unwrap();
        let err = ledger
            .confirm_delivery(pid, buyer, &mut treasury, &mut reputation)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::AlreadySettled(i) if i == pid));

        // The second attempt must not double-pay or double-credit
        assert_eq!(treasury.balance(seller), Decimal::TEN);
        assert_eq!(reputation.reputation(seller).positive_reviews, 1);
    }

    #[test]
    fn confirm_after_dispute_already_settled() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let (pid, buyer, _) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        ledger.mark_disputed(pid, buyer).unwrap();
        let err = ledger
            .confirm_delivery(pid, buyer, &mut treasury, &mut reputation)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::AlreadySettled(i) if i == pid));
    }

    #[test]
    fn failed_payout_leaves_escrow_held() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let (pid, buyer, seller) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);
        treasury.suspend(seller);

        let err = ledger
            .confirm_delivery(pid, buyer, &mut treasury, &mut reputation)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::TransferFailed { .. }));

        // State fully preserved for a retry
        assert_eq!(ledger.get(pid).unwrap().state(), EscrowState::Held);
        assert_eq!(treasury.held(), Decimal::TEN);
        assert_eq!(reputation.reputation(seller).positive_reviews, 0);

        // Retry succeeds once the seller accepts payouts again
        treasury.reinstate(seller);
        ledger
            .confirm_delivery(pid, buyer, &mut treasury, &mut reputation)
            .unwrap();
        assert_eq!(treasury.balance(seller), Decimal::TEN);
    }

    #[test]
    fn mark_disputed_flips_flag_only() {
        let (mut ledger, mut treasury, _) = setup();
        let (pid, buyer, _) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        ledger.mark_disputed(pid, buyer).unwrap();
        let escrow = ledger.get(pid).unwrap();
        assert_eq!(escrow.state(), EscrowState::Disputed);
        assert!(!escrow.released);
        // Funds stay in custody until the verdict
        assert_eq!(treasury.held(), Decimal::TEN);
    }

    #[test]
    fn mark_disputed_by_non_buyer_unauthorized() {
        let (mut ledger, mut treasury, _) = setup();
        let (pid, _, seller) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        let err = ledger.mark_disputed(pid, seller).unwrap_err();
        assert!(matches!(err, OpencourtError::Unauthorized { .. }));
        assert_eq!(ledger.get(pid).unwrap().state(), EscrowState::Held);
    }

    #[test]
    fn release_verdict_refunds_buyer() {
        let (mut ledger, mut treasury, _) = setup();
        let (pid, buyer, _) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);
        ledger.mark_disputed(pid, buyer).unwrap();

        let (winner, amount) = ledger.release_verdict(pid, true, &mut treasury).unwrap();
        assert_eq!(winner, buyer);
        assert_eq!(amount, Decimal::TEN);
        assert_eq!(treasury.balance(buyer), Decimal::TEN);
        assert_eq!(treasury.held(), Decimal::ZERO);
    }

    #[test]
    fn release_verdict_pays_seller() {
        let (mut ledger, mut treasury, _) = setup();
        let (pid, buyer, seller) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);
        ledger.mark_disputed(pid, buyer).unwrap();

        let (winner, _) = ledger.release_verdict(pid, false, &mut treasury).unwrap();
        assert_eq!(winner, seller);
        assert_eq!(treasury.balance(seller), Decimal::TEN);
    }

    #[test]
    fn release_verdict_requires_disputed_state() {
        let (mut ledger, mut treasury, _) = setup();
        let (pid, _, _) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);

        let err = ledger.release_verdict(pid, true, &mut treasury).unwrap_err();
        assert!(matches!(err, OpencourtError::Internal(_)));
        assert_eq!(treasury.held(), Decimal::TEN);
    }

    #[test]
    fn release_verdict_with_suspended_winner_fails() {
        let (mut ledger, mut treasury, _) = setup();
        let (pid, buyer, _) = open_funded(&mut ledger, &mut treasury, Decimal::TEN);
        ledger.mark_disputed(pid, buyer).unwrap();
        treasury.suspend(buyer);

        let err = ledger.release_verdict(pid, true, &mut treasury).unwrap_err();
        assert!(matches!(err, OpencourtError::TransferFailed { .. }));
        assert_eq!(treasury.held(), Decimal::TEN);
    }

    #[test]
    fn unknown_purchase_not_found() {
        let (mut ledger, mut treasury, mut reputation) = setup();
        let err = ledger
            .confirm_delivery(PurchaseId(404), AccountId::new(), &mut treasury, &mut reputation)
            .unwrap_err();
        assert!(matches!(err, OpencourtError::EscrowNotFound(_)));
    }
}
