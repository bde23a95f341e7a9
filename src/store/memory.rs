//! In-Memory Record Store
//!
//! HashMap-backed store used when no hosted database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::warn;

use super::{DeletedRecords, PerishableRecord, RecordId, RecordStore};
use crate::error::StoreResult;

// == Memory Store ==
/// Process-local record store.
///
/// The filtered delete runs under a single write lock, so it is atomic with
/// respect to other callers of the same store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, PerishableRecord>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`.
    pub fn with_records(records: impl IntoIterator<Item = PerishableRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    // == Insert ==
    /// Stores a record, replacing any record with the same id.
    pub async fn insert(&self, record: PerishableRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    // == Get ==
    /// Returns a copy of the record with `id`.
    pub async fn get(&self, id: &RecordId) -> Option<PerishableRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Returns all ids, sorted.
    pub async fn ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.records.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    // == Length ==
    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn delete_expired_before(&self, cutoff: NaiveDate) -> StoreResult<DeletedRecords> {
        let mut records = self.records.write().await;

        let expired_ids: Vec<RecordId> = records
            .values()
            .filter(|record| match record.is_expired_on(cutoff) {
                Ok(expired) => expired,
                Err(err) => {
                    // Left in place; a bad date never matches the delete predicate
                    warn!(record_id = %record.id, error = %err, "Skipping malformed record");
                    false
                }
            })
            .map(|record| record.id.clone())
            .collect();

        let removed: Vec<PerishableRecord> = expired_ids
            .iter()
            .filter_map(|id| records.remove(id))
            .collect();
        Ok(removed.into())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        store
            .insert(PerishableRecord::new("A", "2024-01-01").with_field("name", "Ibuprofen"))
            .await;

        let record = store.get(&RecordId::from("A")).await.unwrap();
        assert_eq!(record.expiry_date, "2024-01-01");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_overwrites_same_id() {
        let store = MemoryStore::new();
        store.insert(PerishableRecord::new("A", "2024-01-01")).await;
        store.insert(PerishableRecord::new("A", "2025-01-01")).await;

        assert_eq!(store.len().await, 1);
        let record = store.get(&RecordId::from("A")).await.unwrap();
        assert_eq!(record.expiry_date, "2025-01-01");
    }

    #[tokio::test]
    async fn test_delete_expired_before_is_strict() {
        let store = MemoryStore::with_records([
            PerishableRecord::new("yesterday", "2024-02-29"),
            PerishableRecord::new("today", "2024-03-01"),
            PerishableRecord::new("tomorrow", "2024-03-02"),
        ]);

        let removed = assert_ok!(store.delete_expired_before(date("2024-03-01")).await);

        assert_eq!(removed.count(), 1);
        assert_eq!(removed.ids(), vec![RecordId::from("yesterday")]);
        assert_eq!(
            store.ids().await,
            vec![RecordId::from("today"), RecordId::from("tomorrow")]
        );
    }

    #[tokio::test]
    async fn test_delete_keeps_malformed_records() {
        let store = MemoryStore::with_records([
            PerishableRecord::new("old", "2020-01-01"),
            PerishableRecord::new("garbled", "next tuesday"),
            PerishableRecord::new("blank", ""),
        ]);

        let removed = assert_ok!(store.delete_expired_before(date("2024-03-01")).await);

        assert_eq!(removed.count(), 1);
        assert_eq!(removed.unidentified, 0);
        assert_eq!(
            store.ids().await,
            vec![RecordId::from("blank"), RecordId::from("garbled")]
        );
    }

    #[tokio::test]
    async fn test_delete_on_empty_store() {
        let store = MemoryStore::new();
        let removed = assert_ok!(store.delete_expired_before(date("2024-03-01")).await);
        assert_eq!(removed, DeletedRecords::default());
    }
}
