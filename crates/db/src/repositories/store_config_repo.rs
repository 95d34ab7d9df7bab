//! Repository for the `store_config` key/value table.

use florist_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::store_config::StoreSetting;

pub struct StoreConfigRepo;

impl StoreConfigRepo {
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<StoreSetting>, sqlx::Error> {
        sqlx::query_as::<_, StoreSetting>(
            "SELECT key, value, updated_at FROM store_config WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// All settings ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<StoreSetting>, sqlx::Error> {
        sqlx::query_as::<_, StoreSetting>(
            "SELECT key, value, updated_at FROM store_config ORDER BY key",
        )
        .fetch_all(pool)
        .await
    }

    /// Insert or replace a setting.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        value: &str,
        now: Timestamp,
    ) -> Result<StoreSetting, sqlx::Error> {
        sqlx::query_as::<_, StoreSetting>(
            "INSERT INTO store_config (key, value, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at \
             RETURNING key, value, updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}
