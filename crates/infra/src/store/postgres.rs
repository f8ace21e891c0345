//! Postgres-backed versioned-record store.
//!
//! One `records` table keyed by `(record_type, record_id)` with a `version`
//! column holding the optimistic concurrency token. Commits run in a single
//! database transaction; every write is a compare-and-swap
//! (`UPDATE ... WHERE version = $expected`), so the whole batch either lands
//! or rolls back.
//!
//! ## Error mapping
//!
//! | SQLx error | PostgreSQL code | StoreError | Scenario |
//! |---|---|---|---|
//! | Database (unique violation) | `23505` | `Conflict` | Concurrent insert of the same record |
//! | Database (other) | any other | `Storage` | Constraint/database failure |
//! | PoolClosed / Io / other | n/a | `Storage` | Connection-level failure |
//!
//! A compare-and-swap `UPDATE` that matches zero rows is also a `Conflict`:
//! the record moved (or vanished) since it was read.

use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use vendora_core::ExpectedVersion;

use super::r#trait::{RecordWrite, StateStore, StoreError, VersionedRecord};

/// Postgres-backed store. Cloneable; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStateStore {
    pool: Arc<PgPool>,
}

impl PostgresStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Load one record. `Ok(None)` when the record does not exist.
    #[instrument(skip(self), fields(record_type, record_id = %record_id), err)]
    pub async fn load_record(
        &self,
        record_type: &str,
        record_id: Uuid,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT record_type, record_id, version, payload
            FROM records
            WHERE record_type = $1 AND record_id = $2
            "#,
        )
        .bind(record_type)
        .bind(record_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_record", e))?;

        row.map(|row| {
            let version: i64 = row
                .try_get("version")
                .map_err(|e| StoreError::Storage(format!("failed to read version: {e}")))?;
            Ok(VersionedRecord {
                record_id,
                record_type: record_type.to_string(),
                version: version as u64,
                payload: row
                    .try_get("payload")
                    .map_err(|e| StoreError::Storage(format!("failed to read payload: {e}")))?,
            })
        })
        .transpose()
    }

    /// Atomically apply a batch of version-checked writes.
    #[instrument(skip(self, writes), fields(write_count = writes.len()), err)]
    pub async fn commit_batch(&self, writes: Vec<RecordWrite>) -> Result<(), StoreError> {
        if writes.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        for write in &writes {
            apply_write(&mut tx, write).await?;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }
}

async fn apply_write(
    tx: &mut Transaction<'_, Postgres>,
    write: &RecordWrite,
) -> Result<(), StoreError> {
    match write.expected_version {
        // Insert: the primary key enforces "did not exist yet".
        ExpectedVersion::Exact(0) => {
            sqlx::query(
                r#"
                INSERT INTO records (record_type, record_id, version, payload, updated_at)
                VALUES ($1, $2, 1, $3, now())
                "#,
            )
            .bind(&write.record_type)
            .bind(write.record_id)
            .bind(&write.payload)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;
            Ok(())
        }
        // Compare-and-swap update.
        ExpectedVersion::Exact(expected) => {
            let result = sqlx::query(
                r#"
                UPDATE records
                SET version = version + 1, payload = $3, updated_at = now()
                WHERE record_type = $1 AND record_id = $2 AND version = $4
                "#,
            )
            .bind(&write.record_type)
            .bind(write.record_id)
            .bind(&write.payload)
            .bind(expected as i64)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::Conflict(format!(
                    "record {}/{}: version is no longer {expected}",
                    write.record_type, write.record_id
                )));
            }
            Ok(())
        }
        // Unconditional upsert.
        ExpectedVersion::Any => {
            sqlx::query(
                r#"
                INSERT INTO records (record_type, record_id, version, payload, updated_at)
                VALUES ($1, $2, 1, $3, now())
                ON CONFLICT (record_type, record_id)
                DO UPDATE SET version = records.version + 1,
                              payload = EXCLUDED.payload,
                              updated_at = now()
                "#,
            )
            .bind(&write.record_type)
            .bind(write.record_id)
            .bind(&write.payload)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("upsert", e))?;
            Ok(())
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // Unique violation: a concurrent insert won the race.
            Some("23505") => StoreError::Conflict(format!(
                "{operation}: concurrent insert detected: {db_err}"
            )),
            _ => StoreError::Storage(format!("{operation}: database error: {db_err}")),
        },
        _ => StoreError::Storage(format!("{operation}: {err}")),
    }
}

impl StateStore for PostgresStateStore {
    fn load(
        &self,
        record_type: &str,
        record_id: Uuid,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            StoreError::Storage(
                "PostgresStateStore requires a tokio runtime context".to_string(),
            )
        })?;
        handle.block_on(self.load_record(record_type, record_id))
    }

    fn commit(&self, writes: Vec<RecordWrite>) -> Result<(), StoreError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            StoreError::Storage(
                "PostgresStateStore requires a tokio runtime context".to_string(),
            )
        })?;
        handle.block_on(self.commit_batch(writes))
    }
}
