//! Read-side record queries (inspection/audit listing).

use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use super::postgres::PostgresStateStore;
use super::r#trait::{StoreError, VersionedRecord};

/// Offset/limit pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// Paginated record listing result.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Vec<VersionedRecord>,
    /// Total number of records of the queried type (across all pages).
    pub total: u64,
    pub pagination: Pagination,
    pub has_more: bool,
}

/// Async query interface for record inspection.
///
/// Read-only; intended for audit listings (e.g. a user's transactions). The
/// write path goes through `StateStore::load` instead.
#[async_trait::async_trait]
pub trait RecordQuery: Send + Sync {
    /// List records of one type ordered by id (UUIDv7, so time-ordered).
    async fn list_records(
        &self,
        record_type: &str,
        pagination: Pagination,
    ) -> Result<RecordPage, StoreError>;
}

#[async_trait::async_trait]
impl RecordQuery for PostgresStateStore {
    async fn list_records(
        &self,
        record_type: &str,
        pagination: Pagination,
    ) -> Result<RecordPage, StoreError> {
        let count_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM records
            WHERE record_type = $1
            "#,
        )
        .bind(record_type)
        .fetch_one(self.pool())
        .await
        .map_err(|e| StoreError::Storage(format!("count_records: {e}")))?;

        let total: i64 = count_row
            .try_get("total")
            .map_err(|e| StoreError::Storage(format!("failed to read count: {e}")))?;

        let rows = sqlx::query(
            r#"
            SELECT record_type, record_id, version, payload
            FROM records
            WHERE record_type = $1
            ORDER BY record_id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(record_type)
        .bind(pagination.offset as i64)
        .bind(pagination.limit as i64)
        .fetch_all(self.pool())
        .await
        .map_err(|e| StoreError::Storage(format!("list_records: {e}")))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let version: i64 = row
                .try_get("version")
                .map_err(|e| StoreError::Storage(format!("failed to read version: {e}")))?;
            let record_id: Uuid = row
                .try_get("record_id")
                .map_err(|e| StoreError::Storage(format!("failed to read record_id: {e}")))?;
            records.push(VersionedRecord {
                record_id,
                record_type: record_type.to_string(),
                version: version as u64,
                payload: row
                    .try_get("payload")
                    .map_err(|e| StoreError::Storage(format!("failed to read payload: {e}")))?,
            });
        }

        let has_more = pagination.offset + (records.len() as u64) < total as u64;

        Ok(RecordPage {
            records,
            total: total as u64,
            pagination,
            has_more,
        })
    }
}
