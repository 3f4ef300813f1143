use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReadingStore, StoreError};
use crate::db::models::{NewReading, Reading};

/// In-process reading store, keyed by container id.
///
/// Each container's readings are kept in insertion order, so the last entry
/// is the newest even when two inserts share a timestamp. Cloning shares the
/// underlying data.
#[derive(Clone, Default)]
pub struct MemoryReadingStore {
    inner: Arc<RwLock<BTreeMap<i32, Vec<Reading>>>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn insert(&self, container_id: i32, reading: NewReading) -> Result<Reading, StoreError> {
        let row = Reading {
            id: Uuid::new_v4(),
            container_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            distance: reading.distance,
            recorded_at: Utc::now(),
        };

        self.inner
            .write()
            .await
            .entry(container_id)
            .or_default()
            .push(row.clone());

        Ok(row)
    }

    async fn latest_per_container(&self) -> Result<Vec<Reading>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .values()
            .filter_map(|readings| readings.last().cloned())
            .collect())
    }

    async fn history(&self, container_id: i32, limit: u32) -> Result<Vec<Reading>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .get(&container_id)
            .map(|readings| {
                readings
                    .iter()
                    .rev()
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(distance: f64) -> NewReading {
        NewReading {
            temperature: 20.0,
            humidity: 40.0,
            distance,
        }
    }

    #[tokio::test]
    async fn empty_store_returns_nothing() {
        let store = MemoryReadingStore::new();
        assert!(store.latest_per_container().await.unwrap().is_empty());
        assert!(store.history(1, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_keeps_values() {
        let store = MemoryReadingStore::new();
        let row = store.insert(4, reading(12.0)).await.unwrap();

        assert_eq!(row.container_id, 4);
        assert_eq!(row.distance, 12.0);
        assert_eq!(store.history(4, 10).await.unwrap()[0].id, row.id);
    }

    #[tokio::test]
    async fn latest_is_newest_reading_per_container() {
        let store = MemoryReadingStore::new();
        store.insert(1, reading(20.0)).await.unwrap();
        store.insert(1, reading(10.0)).await.unwrap();
        store.insert(2, reading(3.0)).await.unwrap();

        let latest = store.latest_per_container().await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].container_id, 1);
        assert_eq!(latest[0].distance, 10.0);
        assert_eq!(latest[1].container_id, 2);
    }

    #[tokio::test]
    async fn latest_is_ordered_by_container_id() {
        let store = MemoryReadingStore::new();
        for id in [9, 3, 5] {
            store.insert(id, reading(1.0)).await.unwrap();
        }

        let ids: Vec<i32> = store
            .latest_per_container()
            .await
            .unwrap()
            .iter()
            .map(|r| r.container_id)
            .collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let store = MemoryReadingStore::new();
        for d in [1.0, 2.0, 3.0] {
            store.insert(1, reading(d)).await.unwrap();
        }
        store.insert(2, reading(9.0)).await.unwrap();

        let rows = store.history(1, 2).await.unwrap();
        let distances: Vec<f64> = rows.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![3.0, 2.0]);

        assert!(store.history(1, 0).await.unwrap().is_empty());
        assert_eq!(store.history(1, 50).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let store = MemoryReadingStore::new();
        let clone = store.clone();

        store.insert(1, reading(5.0)).await.unwrap();

        assert_eq!(clone.latest_per_container().await.unwrap().len(), 1);
    }
}
