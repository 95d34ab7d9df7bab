//! Repository for the `deliveries` table.

use florist_core::types::{new_id, EntityId, Timestamp};
use sqlx::PgConnection;

use crate::models::order::Delivery;

/// Column list for `deliveries` queries.
const COLUMNS: &str = "id, order_id, arrived_time, proof_photo_url, created_at, updated_at";

pub struct DeliveryRepo;

impl DeliveryRepo {
    /// The delivery record of an order, if it was ever completed.
    pub async fn find_for_order(
        conn: &mut PgConnection,
        order_id: EntityId,
    ) -> Result<Option<Delivery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deliveries WHERE order_id = $1");
        sqlx::query_as::<_, Delivery>(&query)
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Create the delivery record, or overwrite its proof if one exists.
    ///
    /// `order_id` is unique, so an order never has two records.
    pub async fn upsert(
        conn: &mut PgConnection,
        order_id: EntityId,
        arrived_time: Timestamp,
        proof_photo_url: Option<&str>,
    ) -> Result<Delivery, sqlx::Error> {
        let query = format!(
            "INSERT INTO deliveries \
                (id, order_id, arrived_time, proof_photo_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $3, $3) \
             ON CONFLICT (order_id) DO UPDATE SET \
                arrived_time = EXCLUDED.arrived_time, \
                proof_photo_url = EXCLUDED.proof_photo_url, \
                updated_at = EXCLUDED.updated_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delivery>(&query)
            .bind(new_id())
            .bind(order_id)
            .bind(arrived_time)
            .bind(proof_photo_url)
            .fetch_one(&mut *conn)
            .await
    }
}
