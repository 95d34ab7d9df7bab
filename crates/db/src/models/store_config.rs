//! StoreConfig key/value rows.

use florist_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `store_config` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSetting {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}
