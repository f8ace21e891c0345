//! Versioned-record persistence gateway.
//!
//! This module defines an infrastructure-facing abstraction for loading and
//! committing optimistically versioned aggregate records without making any
//! storage assumptions. Commit batches are all-or-nothing: a transactional
//! unit of work whose version checks either all pass or nothing is written.

pub mod in_memory;
pub mod postgres;
pub mod query;
pub mod r#trait;

pub use in_memory::InMemoryStateStore;
pub use postgres::PostgresStateStore;
pub use query::{Pagination, RecordPage, RecordQuery};
pub use r#trait::{record_type, RecordWrite, StateStore, StoreError, VersionedRecord};
