//! Return-order processing service.
//!
//! Implements the review decision for a return claim: authorization checks,
//! the one-way state transition with its per-item cascade, and (on approval)
//! the refund, committed together with the status change as one store batch.

use chrono::{DateTime, Utc};
use tracing::instrument;

use vendora_auth::{ActorToken, IdentityResolver};
use vendora_core::{DomainError, DomainResult, ExpectedVersion, ReturnOrderId};
use vendora_returns::ReturnOrder;
use vendora_wallet::TransactionSource;

use crate::store::{record_type, RecordWrite, StateStore};

use super::wallet::RefundIssuer;
use super::load_user;

/// Review request for one return claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReturnRequest {
    pub return_order_id: ReturnOrderId,
    pub approve: bool,
    pub reason: String,
}

/// Orchestrates return-claim reviews over the persistence gateway.
///
/// Checks run in a fixed order and short-circuit on the first failure:
/// token, actor existence, admin role, claim existence, claim state, commit.
/// Nothing is persisted until the final commit, so any failure (a refund
/// that cannot be staged, a stale version token) leaves the claim untouched
/// and the whole operation retryable.
#[derive(Debug)]
pub struct ReturnProcessor<S, R, L> {
    store: S,
    resolver: R,
    ledger: L,
}

impl<S, R, L> ReturnProcessor<S, R, L> {
    pub fn new(store: S, resolver: R, ledger: L) -> Self {
        Self {
            store,
            resolver,
            ledger,
        }
    }
}

impl<S, R, L> ReturnProcessor<S, R, L>
where
    S: StateStore,
    R: IdentityResolver,
    L: RefundIssuer,
{
    /// Approve or reject a pending return claim.
    ///
    /// On approval the requesting user is refunded the claim's amount; the
    /// refund transaction, the balance credit, and the status transition
    /// commit as a single unit. On rejection no money moves.
    #[instrument(
        skip(self, token, request),
        fields(return_order_id = %request.return_order_id, approve = request.approve),
        err
    )]
    pub fn process_return_request(
        &self,
        token: &ActorToken,
        request: ProcessReturnRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let actor_id = self.resolver.resolve(token)?;
        let (_, actor) = load_user(&self.store, actor_id)?;

        // A recognized-but-unprivileged actor is a policy violation, not an
        // identity failure.
        if !actor.role().is_admin() {
            return Err(DomainError::role_invalid(format!(
                "{} cannot process return requests",
                actor.role()
            )));
        }

        let stored = self
            .store
            .load(record_type::RETURN_ORDER, *request.return_order_id.as_uuid())
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::not_found("return order"))?;
        let mut claim: ReturnOrder = stored.decode().map_err(DomainError::from)?;
        let expected = ExpectedVersion::Exact(stored.version);

        if request.approve {
            claim.approve(actor_id, request.reason, now)?;
        } else {
            claim.reject(actor_id, request.reason, now)?;
        }

        let mut writes = vec![
            RecordWrite::from_typed(
                record_type::RETURN_ORDER,
                *request.return_order_id.as_uuid(),
                expected,
                &claim,
            )
            .map_err(DomainError::from)?,
        ];
        if request.approve {
            self.ledger.stage_refund(
                &mut writes,
                claim.requested_by(),
                claim.amount(),
                TransactionSource::ReturnOrder(claim.id_typed()),
                now,
            )?;
        }

        self.store.commit(writes).map_err(DomainError::from)?;

        tracing::info!(status = ?claim.status(), reviewer = %actor_id, "return request processed");
        Ok(())
    }
}
