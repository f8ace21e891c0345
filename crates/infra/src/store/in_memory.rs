use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use uuid::Uuid;

use super::r#trait::{RecordWrite, StateStore, StoreError, VersionedRecord};

/// In-memory versioned-record store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    records: RwLock<HashMap<(String, Uuid), VersionedRecord>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records of one type, in no particular order. Test/dev helper.
    pub fn list(&self, record_type: &str) -> Vec<VersionedRecord> {
        let map = match self.records.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.iter()
            .filter_map(|((t, _id), v)| if t == record_type { Some(v.clone()) } else { None })
            .collect()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(
        &self,
        record_type: &str,
        record_id: Uuid,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let map = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(map.get(&(record_type.to_string(), record_id)).cloned())
    }

    fn commit(&self, writes: Vec<RecordWrite>) -> Result<(), StoreError> {
        if writes.is_empty() {
            return Ok(());
        }

        // A batch must not touch the same record twice; the second write
        // would silently see its own sibling's version bump.
        let mut seen: HashSet<(&str, Uuid)> = HashSet::new();
        for (idx, w) in writes.iter().enumerate() {
            if !seen.insert((w.record_type.as_str(), w.record_id)) {
                return Err(StoreError::Storage(format!(
                    "batch touches the same record twice (index {idx})"
                )));
            }
        }

        let mut map = self
            .records
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        // Validate every expected version before applying anything.
        let mut staged = Vec::with_capacity(writes.len());
        for w in &writes {
            let key = (w.record_type.clone(), w.record_id);
            let current = map.get(&key).map(|r| r.version).unwrap_or(0);
            if !w.expected_version.matches(current) {
                return Err(StoreError::Conflict(format!(
                    "record {}/{}: expected {:?}, found {current}",
                    w.record_type, w.record_id, w.expected_version
                )));
            }
            staged.push((key, current + 1));
        }

        // All checks passed; apply the whole batch.
        for (w, (key, new_version)) in writes.into_iter().zip(staged) {
            map.insert(
                key,
                VersionedRecord {
                    record_id: w.record_id,
                    record_type: w.record_type,
                    version: new_version,
                    payload: w.payload,
                },
            );
        }

        Ok(())
    }
}
