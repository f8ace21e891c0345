//! Transaction component: the only writer of user balances.

use chrono::{DateTime, Utc};
use tracing::instrument;

use vendora_auth::{ActorToken, IdentityResolver};
use vendora_core::{DomainError, DomainResult, ExpectedVersion, Money, UserId};
use vendora_wallet::{TransactionRecord, TransactionSource};

use crate::store::{record_type, RecordWrite, StateStore};

use super::load_user;

/// Stages a refund (balance credit plus ledger insert) into a caller-owned
/// commit batch.
///
/// This is the seam between the return state machine and the money movement:
/// the processor stages its status transition and the refund into the same
/// batch, so both land in one store commit or neither does.
pub trait RefundIssuer: Send + Sync {
    fn stage_refund(
        &self,
        writes: &mut Vec<RecordWrite>,
        user_id: UserId,
        amount: Money,
        source: TransactionSource,
        now: DateTime<Utc>,
    ) -> DomainResult<TransactionRecord>;
}

/// Creates refund/deposit transactions and mutates balances under the same
/// optimistic-version discipline as every other aggregate write.
#[derive(Debug)]
pub struct TransactionLedger<S, R> {
    store: S,
    resolver: R,
}

impl<S, R> TransactionLedger<S, R> {
    pub fn new(store: S, resolver: R) -> Self {
        Self { store, resolver }
    }
}

impl<S, R> TransactionLedger<S, R>
where
    S: StateStore,
    R: IdentityResolver,
{
    /// Credit `amount` to `user_id` and record the refund transaction.
    ///
    /// Zero amounts are valid no-op credits that still leave a ledger entry.
    /// Synchronous with respect to the caller: the credit is durable (or the
    /// call has failed) by the time this returns.
    #[instrument(skip(self), fields(user_id = %user_id, amount = %amount), err)]
    pub fn create_refund_when_cancel(
        &self,
        user_id: UserId,
        amount: Money,
        source: TransactionSource,
        now: DateTime<Utc>,
    ) -> DomainResult<TransactionRecord> {
        let mut writes = Vec::new();
        let record = self.stage_refund(&mut writes, user_id, amount, source, now)?;
        self.store.commit(writes).map_err(DomainError::from)?;

        tracing::info!(transaction_id = %record.id_typed(), "refund transaction created");
        Ok(record)
    }

    /// Self-service balance top-up for the actor behind `token`.
    #[instrument(skip(self, token), fields(amount = %amount), err)]
    pub fn deposit_into_balance(
        &self,
        token: &ActorToken,
        amount: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<TransactionRecord> {
        let user_id = self.resolver.resolve(token)?;
        let (user_version, mut user) = load_user(&self.store, user_id)?;

        let record = TransactionRecord::deposit(user_id, amount, now)?;
        user.credit(amount)?;

        let writes = vec![
            RecordWrite::from_typed(
                record_type::USER,
                *user_id.as_uuid(),
                ExpectedVersion::Exact(user_version),
                &user,
            )
            .map_err(DomainError::from)?,
            RecordWrite::from_typed(
                record_type::TRANSACTION,
                *record.id_typed().as_uuid(),
                ExpectedVersion::Exact(0),
                &record,
            )
            .map_err(DomainError::from)?,
        ];
        self.store.commit(writes).map_err(DomainError::from)?;

        tracing::info!(
            transaction_id = %record.id_typed(),
            user_id = %user_id,
            "deposit transaction created"
        );
        Ok(record)
    }
}

impl<S, R> RefundIssuer for TransactionLedger<S, R>
where
    S: StateStore,
    R: IdentityResolver,
{
    fn stage_refund(
        &self,
        writes: &mut Vec<RecordWrite>,
        user_id: UserId,
        amount: Money,
        source: TransactionSource,
        now: DateTime<Utc>,
    ) -> DomainResult<TransactionRecord> {
        let record = TransactionRecord::refund(user_id, amount, source, now)?;

        let (user_version, mut user) = load_user(&self.store, user_id)?;
        user.credit(amount)?;

        writes.push(
            RecordWrite::from_typed(
                record_type::USER,
                *user_id.as_uuid(),
                ExpectedVersion::Exact(user_version),
                &user,
            )
            .map_err(DomainError::from)?,
        );
        writes.push(
            RecordWrite::from_typed(
                record_type::TRANSACTION,
                *record.id_typed().as_uuid(),
                ExpectedVersion::Exact(0),
                &record,
            )
            .map_err(DomainError::from)?,
        );

        Ok(record)
    }
}
