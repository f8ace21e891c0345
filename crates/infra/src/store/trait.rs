use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use vendora_core::{DomainError, ExpectedVersion};

/// Record type tags for the aggregates the gateway persists.
///
/// The store keys records by `(record_type, record_id)`; tags keep id spaces
/// of different aggregates from colliding and make storage rows greppable.
pub mod record_type {
    pub const USER: &str = "auth.user";
    pub const ORDER: &str = "orders.order";
    pub const RETURN_ORDER: &str = "returns.return_order";
    pub const TRANSACTION: &str = "wallet.transaction";
}

/// A record as stored: current version plus opaque JSON payload.
///
/// The version is the optimistic concurrency token. It is assigned by the
/// store (starting at 1 on first insert, +1 per committed write) and compared
/// against `RecordWrite::expected_version` at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    pub record_id: Uuid,
    pub record_type: String,
    pub version: u64,
    pub payload: JsonValue,
}

impl VersionedRecord {
    /// Decode the payload into a typed aggregate.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| StoreError::Codec(format!("payload deserialization failed: {e}")))
    }
}

/// One pending write in a commit batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWrite {
    pub record_id: Uuid,
    pub record_type: String,
    /// Version the record must still be at. `Exact(0)` inserts a new record.
    pub expected_version: ExpectedVersion,
    pub payload: JsonValue,
}

impl RecordWrite {
    /// Convenience constructor from a typed aggregate.
    pub fn from_typed<T: Serialize>(
        record_type: impl Into<String>,
        record_id: Uuid,
        expected_version: ExpectedVersion,
        value: &T,
    ) -> Result<Self, StoreError> {
        let payload = serde_json::to_value(value)
            .map_err(|e| StoreError::Codec(format!("payload serialization failed: {e}")))?;
        Ok(Self {
            record_id,
            record_type: record_type.into(),
            expected_version,
            payload,
        })
    }
}

/// Persistence gateway operation error.
///
/// `Conflict` (stale version) is deliberately a distinct variant from
/// `Storage` so callers can tell contention from outage; the service boundary
/// still collapses both into the externally visible Conflict kind.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("payload codec failure: {0}")]
    Codec(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => DomainError::version_conflict(msg),
            StoreError::Codec(msg) | StoreError::Storage(msg) => DomainError::storage(msg),
        }
    }
}

/// Versioned-record store with transactional multi-record commit.
///
/// ## Commit semantics
///
/// `commit()` is a unit of work:
/// - every write's `expected_version` is validated against the current record
///   version first; any mismatch fails the whole batch with `Conflict`
/// - on success all writes are applied atomically and each written record's
///   version advances to `current + 1`
/// - a failed commit leaves the store untouched; callers may retry from
///   scratch
///
/// This is the sole serialization mechanism between concurrent mutators of
/// the same record: of two commits racing on one version token, exactly one
/// succeeds.
pub trait StateStore: Send + Sync {
    /// Load one record. `Ok(None)` means the record does not exist.
    fn load(&self, record_type: &str, record_id: Uuid)
        -> Result<Option<VersionedRecord>, StoreError>;

    /// Atomically apply a batch of version-checked writes (all or nothing).
    fn commit(&self, writes: Vec<RecordWrite>) -> Result<(), StoreError>;
}

impl<S> StateStore for Arc<S>
where
    S: StateStore + ?Sized,
{
    fn load(
        &self,
        record_type: &str,
        record_id: Uuid,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        (**self).load(record_type, record_id)
    }

    fn commit(&self, writes: Vec<RecordWrite>) -> Result<(), StoreError> {
        (**self).commit(writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_into_the_domain_taxonomy() {
        let conflict: DomainError = StoreError::Conflict("expected 1, found 2".into()).into();
        assert!(matches!(conflict, DomainError::VersionConflict(_)));

        let storage: DomainError = StoreError::Storage("pool closed".into()).into();
        assert!(matches!(storage, DomainError::Storage(_)));

        let codec: DomainError = StoreError::Codec("bad payload".into()).into();
        assert!(matches!(codec, DomainError::Storage(_)));
    }
}
