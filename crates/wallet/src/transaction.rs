//! Immutable balance-ledger transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendora_core::{DomainError, DomainResult, Entity, Money, OrderId, ReturnOrderId, TransactionId, UserId};

/// Direction/purpose of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Refund,
    Deposit,
}

/// What caused the ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "source", content = "id")]
pub enum TransactionSource {
    /// Refund issued for an approved return claim.
    ReturnOrder(ReturnOrderId),
    /// Refund issued when a whole order was canceled.
    OrderCancel(OrderId),
    /// Self-service balance top-up.
    SelfService,
}

/// One immutable ledger entry crediting a user's balance.
///
/// Records are write-once: there is no mutation API, and corrections are new
/// entries, never edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: TransactionId,
    user_id: UserId,
    kind: TransactionKind,
    amount: Money,
    source: TransactionSource,
    created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Refund credit. Zero is valid: a no-op credit that still leaves an
    /// audit record, keeping call sites uniform.
    pub fn refund(
        user_id: UserId,
        amount: Money,
        source: TransactionSource,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if amount.is_negative() {
            return Err(DomainError::amount_invalid("refund must be non-negative"));
        }
        Ok(Self {
            id: TransactionId::new(),
            user_id,
            kind: TransactionKind::Refund,
            amount,
            source,
            created_at: now,
        })
    }

    /// Self-service deposit. Strictly positive amounts only.
    pub fn deposit(user_id: UserId, amount: Money, now: DateTime<Utc>) -> DomainResult<Self> {
        if !amount.is_positive() {
            return Err(DomainError::amount_invalid("deposit must be positive"));
        }
        Ok(Self {
            id: TransactionId::new(),
            user_id,
            kind: TransactionKind::Deposit,
            amount,
            source: TransactionSource::SelfService,
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> TransactionId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn source(&self) -> TransactionSource {
        self.source
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for TransactionRecord {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_refund_is_recorded() {
        let record = TransactionRecord::refund(
            UserId::new(),
            Money::ZERO,
            TransactionSource::ReturnOrder(ReturnOrderId::new()),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.kind(), TransactionKind::Refund);
        assert!(record.amount().is_zero());
    }

    #[test]
    fn negative_refund_is_rejected() {
        let err = TransactionRecord::refund(
            UserId::new(),
            Money::from_minor(-5),
            TransactionSource::SelfService,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::AmountInvalid(_)));
    }

    #[test]
    fn non_positive_deposit_is_rejected() {
        for minor in [0, -10] {
            let err =
                TransactionRecord::deposit(UserId::new(), Money::from_minor(minor), Utc::now())
                    .unwrap_err();
            assert!(matches!(err, DomainError::AmountInvalid(_)));
        }
    }

    #[test]
    fn deposit_is_tagged_self_service() {
        let record =
            TransactionRecord::deposit(UserId::new(), Money::from_minor(100), Utc::now()).unwrap();
        assert_eq!(record.kind(), TransactionKind::Deposit);
        assert_eq!(record.source(), TransactionSource::SelfService);
    }
}
