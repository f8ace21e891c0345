//! Application services: orchestration of domain logic over the gateway.
//!
//! Services own the decision order (identity, existence, role, state,
//! persist), keep domain aggregates pure, and map `StoreError` into the
//! domain taxonomy at this boundary. No service leaves partial state behind:
//! every mutation goes through a single `StateStore::commit` batch.

pub mod returns;
pub mod wallet;

pub use returns::{ProcessReturnRequest, ReturnProcessor};
pub use wallet::{RefundIssuer, TransactionLedger};

use vendora_auth::User;
use vendora_core::{DomainError, DomainResult, UserId};

use crate::store::{record_type, StateStore};

/// Load a user account plus its current store version token.
pub(crate) fn load_user<S: StateStore>(store: &S, user_id: UserId) -> DomainResult<(u64, User)> {
    let record = store
        .load(record_type::USER, *user_id.as_uuid())
        .map_err(DomainError::from)?
        .ok_or_else(|| DomainError::not_found("user"))?;
    let user: User = record.decode().map_err(DomainError::from)?;
    Ok((record.version, user))
}
