use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReadingStore, StoreError};
use crate::db::models::{NewReading, Reading};

#[derive(Debug, Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn insert(&self, container_id: i32, reading: NewReading) -> Result<Reading, StoreError> {
        let row = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO readings (container_id, temperature, humidity, distance)
            VALUES ($1, $2, $3, $4)
            RETURNING id, container_id, temperature, humidity, distance, recorded_at
            "#,
        )
        .bind(container_id)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.distance)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn latest_per_container(&self) -> Result<Vec<Reading>, StoreError> {
        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT DISTINCT ON (container_id)
                id, container_id, temperature, humidity, distance, recorded_at
            FROM readings
            ORDER BY container_id, recorded_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn history(&self, container_id: i32, limit: u32) -> Result<Vec<Reading>, StoreError> {
        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, container_id, temperature, humidity, distance, recorded_at
            FROM readings
            WHERE container_id = $1
            ORDER BY recorded_at DESC
            LIMIT $2
            "#,
        )
        .bind(container_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
