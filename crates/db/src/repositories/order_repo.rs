//! Repository for the `orders` table.

use florist_core::status::OrderStatus;
use florist_core::types::{EntityId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::order::{NewOrder, Order};

/// Column list for `orders` queries.
const COLUMNS: &str = "\
    id, status, total_amount, recipient_name, recipient_phone, \
    delivery_address, delivery_time, created_at, updated_at";

/// Provides reads and status writes for orders. Orders are never deleted.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order in its initial status.
    pub async fn insert(conn: &mut PgConnection, input: &NewOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders \
                (id, status, total_amount, recipient_name, recipient_phone, \
                 delivery_address, delivery_time, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.id)
            .bind(OrderStatus::INITIAL.as_str())
            .bind(input.total_amount)
            .bind(&input.recipient_name)
            .bind(&input.recipient_phone)
            .bind(&input.delivery_address)
            .bind(input.delivery_time)
            .bind(input.created_at)
            .fetch_one(&mut *conn)
            .await
    }

    /// Find an order by ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: EntityId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Find an order and lock its row until the surrounding transaction ends.
    ///
    /// Concurrent status changes on the same order queue behind this lock.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: EntityId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Write a new status and bump `updated_at`.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: EntityId,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(status.as_str())
            .bind(now)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
    }

    /// List orders newest first, optionally capped.
    pub async fn list(pool: &PgPool, limit: Option<i64>) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Orders created at or after `since`, oldest first.
    pub async fn list_created_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE created_at >= $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Number of orders per status. Statuses with no orders are absent.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM orders GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
