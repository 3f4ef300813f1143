pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::models::{NewReading, Reading};

pub use memory::MemoryReadingStore;
pub use postgres::PgReadingStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Append-only storage of sensor readings.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Append one reading, stamping it with the current server time.
    async fn insert(&self, container_id: i32, reading: NewReading) -> Result<Reading, StoreError>;

    /// The newest reading of every container, ordered by `container_id`.
    async fn latest_per_container(&self) -> Result<Vec<Reading>, StoreError>;

    /// Up to `limit` readings of one container, newest first.
    async fn history(&self, container_id: i32, limit: u32) -> Result<Vec<Reading>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn ReadingStore>;
