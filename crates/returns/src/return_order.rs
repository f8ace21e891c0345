//! Return-order aggregate: one claim per order, settled per line item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendora_core::{
    AggregateRoot, DomainError, DomainResult, Entity, Money, OrderId, OrderItemId, ReturnOrderId,
    ReturnOrderItemId, UserId,
};

/// Return-claim lifecycle, shared by the claim and its items.
///
/// ```text
/// Pending --approve(admin)--> Approved   (cascades items, triggers refund)
/// Pending --reject(admin)-->  Rejected   (cascades items)
/// Approved, Rejected, Completed: terminal for processing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

/// Per-line settlement entry within a return claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnOrderItem {
    pub id: ReturnOrderItemId,
    pub order_item_id: OrderItemId,
    pub status: ReturnStatus,
    pub quantity: u32,
    pub amount: Money,
    pub reason: String,
    pub return_shipping_tracking_code: Option<String>,
}

impl ReturnOrderItem {
    pub fn new(
        order_item_id: OrderItemId,
        quantity: u32,
        amount: Money,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: ReturnOrderItemId::new(),
            order_item_id,
            status: ReturnStatus::Pending,
            quantity,
            amount,
            reason: reason.into(),
            return_shipping_tracking_code: None,
        }
    }
}

impl Entity for ReturnOrderItem {
    type Id = ReturnOrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The admin decision attached to a processed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewer: UserId,
    pub reason: String,
    pub reviewed_at: DateTime<Utc>,
}

/// Aggregate root: ReturnOrder.
///
/// # Invariants
/// - Processing (approve/reject) requires `Pending`; the transition is one-way
///   and `Approved`/`Rejected`/`Completed` are terminal for this operation.
/// - Every still-`Pending` item follows the parent decision in lock-step.
/// - Claims are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnOrder {
    id: ReturnOrderId,
    order_id: OrderId,
    requested_by: UserId,
    status: ReturnStatus,
    request_at: DateTime<Utc>,
    /// Refundable amount for the whole claim, priced at request time.
    amount: Money,
    items: Vec<ReturnOrderItem>,
    review: Option<ReviewRecord>,
    version: u64,
}

impl ReturnOrder {
    /// Create a fresh `Pending` claim (the request-return flow).
    pub fn new(
        id: ReturnOrderId,
        order_id: OrderId,
        requested_by: UserId,
        amount: Money,
        items: Vec<ReturnOrderItem>,
        request_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            requested_by,
            status: ReturnStatus::Pending,
            request_at,
            amount,
            items,
            review: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> ReturnOrderId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn requested_by(&self) -> UserId {
        self.requested_by
    }

    pub fn status(&self) -> ReturnStatus {
        self.status
    }

    pub fn request_at(&self) -> DateTime<Utc> {
        self.request_at
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn items(&self) -> &[ReturnOrderItem] {
        &self.items
    }

    pub fn review(&self) -> Option<&ReviewRecord> {
        self.review.as_ref()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, ReturnStatus::Pending)
    }

    /// Approve the claim: cascade every still-pending item and record the
    /// decision. The caller is responsible for issuing the refund in the same
    /// commit.
    pub fn approve(
        &mut self,
        reviewer: UserId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.transition(ReturnStatus::Approved, reviewer, reason, now)
    }

    /// Reject the claim: cascade every still-pending item and record the
    /// decision. No refund is issued.
    pub fn reject(
        &mut self,
        reviewer: UserId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.transition(ReturnStatus::Rejected, reviewer, reason, now)
    }

    /// Settle an approved claim once the returned goods are received.
    /// `Completed` is terminal.
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != ReturnStatus::Approved {
            return Err(DomainError::state_invalid(format!(
                "only approved return orders can complete (status: {:?})",
                self.status
            )));
        }
        self.status = ReturnStatus::Completed;
        for item in &mut self.items {
            if item.status == ReturnStatus::Approved {
                item.status = ReturnStatus::Completed;
            }
        }
        Ok(())
    }

    fn transition(
        &mut self,
        decision: ReturnStatus,
        reviewer: UserId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_open()?;

        self.status = decision;
        // Explicit cascade over the owned collection; items settled earlier
        // through other flows keep their status.
        for item in &mut self.items {
            if item.status == ReturnStatus::Pending {
                item.status = decision;
            }
        }
        self.review = Some(ReviewRecord {
            reviewer,
            reason: reason.into(),
            reviewed_at: now,
        });
        Ok(())
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if !self.is_open() {
            return Err(DomainError::state_invalid(format!(
                "return order already processed (status: {:?})",
                self.status
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for ReturnOrder {
    type Id = ReturnOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn pending_claim(item_count: usize) -> ReturnOrder {
        let items = (0..item_count)
            .map(|_| ReturnOrderItem::new(OrderItemId::new(), 1, Money::from_minor(100), "damaged"))
            .collect();
        ReturnOrder::new(
            ReturnOrderId::new(),
            OrderId::new(),
            UserId::new(),
            Money::from_minor(100 * item_count as i64),
            items,
            test_time(),
        )
    }

    fn with_status(mut claim: ReturnOrder, status: ReturnStatus) -> ReturnOrder {
        claim.status = status;
        claim
    }

    #[test]
    fn approve_cascades_pending_items() {
        let mut claim = pending_claim(3);
        let reviewer = UserId::new();

        claim.approve(reviewer, "testReason", test_time()).unwrap();

        assert_eq!(claim.status(), ReturnStatus::Approved);
        assert!(claim
            .items()
            .iter()
            .all(|i| i.status == ReturnStatus::Approved));
        let review = claim.review.as_ref().unwrap();
        assert_eq!(review.reviewer, reviewer);
        assert_eq!(review.reason, "testReason");
    }

    #[test]
    fn reject_cascades_pending_items() {
        let mut claim = pending_claim(2);

        claim.reject(UserId::new(), "not eligible", test_time()).unwrap();

        assert_eq!(claim.status(), ReturnStatus::Rejected);
        assert!(claim
            .items()
            .iter()
            .all(|i| i.status == ReturnStatus::Rejected));
    }

    #[test]
    fn cascade_leaves_already_settled_items_alone() {
        let mut claim = pending_claim(2);
        claim.items[1].status = ReturnStatus::Completed;

        claim.approve(UserId::new(), "ok", test_time()).unwrap();

        assert_eq!(claim.items()[0].status, ReturnStatus::Approved);
        assert_eq!(claim.items()[1].status, ReturnStatus::Completed);
    }

    #[test]
    fn completion_requires_an_approved_claim() {
        let mut claim = pending_claim(2);
        assert!(matches!(
            claim.complete().unwrap_err(),
            DomainError::StateInvalid(_)
        ));

        claim.approve(UserId::new(), "ok", test_time()).unwrap();
        claim.complete().unwrap();
        assert_eq!(claim.status(), ReturnStatus::Completed);
        assert!(claim
            .items()
            .iter()
            .all(|i| i.status == ReturnStatus::Completed));

        // Terminal: no second completion.
        assert!(claim.complete().is_err());
    }

    #[test]
    fn processed_claims_cannot_be_reprocessed() {
        for status in [
            ReturnStatus::Approved,
            ReturnStatus::Rejected,
            ReturnStatus::Completed,
        ] {
            let mut claim = with_status(pending_claim(1), status);
            let before = claim.clone();

            let err = claim.approve(UserId::new(), "again", test_time()).unwrap_err();
            assert!(matches!(err, DomainError::StateInvalid(_)));
            assert_eq!(claim, before);

            let err = claim.reject(UserId::new(), "again", test_time()).unwrap_err();
            assert!(matches!(err, DomainError::StateInvalid(_)));
            assert_eq!(claim, before);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after a decision, no item under the claim is still
        /// `Pending`, and every item that was pending carries the decision.
        #[test]
        fn decision_settles_every_pending_item(
            item_count in 1usize..20,
            approve in any::<bool>(),
        ) {
            let mut claim = pending_claim(item_count);
            let decision = if approve {
                claim.approve(UserId::new(), "bulk", test_time()).unwrap();
                ReturnStatus::Approved
            } else {
                claim.reject(UserId::new(), "bulk", test_time()).unwrap();
                ReturnStatus::Rejected
            };

            prop_assert!(claim.items().iter().all(|i| i.status == decision));
            prop_assert_eq!(claim.status(), decision);
        }
    }
}
