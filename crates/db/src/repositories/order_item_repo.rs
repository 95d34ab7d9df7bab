//! Repository for the `order_items` table.

use florist_core::types::EntityId;
use sqlx::{PgConnection, PgPool};

use crate::models::order::{NewOrderItem, OrderItem};

/// Column list for `order_items` queries.
const COLUMNS: &str = "\
    id, order_id, product_id, product_name, product_type, quantity, price, \
    greeting_type, target_name, sender_name, card_message, notes";

pub struct OrderItemRepo;

impl OrderItemRepo {
    /// Insert one line item for `order_id`.
    pub async fn insert(
        conn: &mut PgConnection,
        order_id: EntityId,
        input: &NewOrderItem,
    ) -> Result<OrderItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO order_items \
                (id, order_id, product_id, product_name, product_type, quantity, price, \
                 greeting_type, target_name, sender_name, card_message, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(input.id)
            .bind(order_id)
            .bind(input.product_id)
            .bind(&input.product_name)
            .bind(&input.product_type)
            .bind(input.quantity)
            .bind(input.price)
            .bind(&input.greeting_type)
            .bind(&input.target_name)
            .bind(&input.sender_name)
            .bind(&input.card_message)
            .bind(&input.notes)
            .fetch_one(&mut *conn)
            .await
    }

    /// Items of a single order.
    pub async fn list_for_order(
        conn: &mut PgConnection,
        order_id: EntityId,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(&mut *conn)
            .await
    }

    /// Items of many orders in one round trip.
    pub async fn list_for_orders(
        pool: &PgPool,
        order_ids: &[EntityId],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_ids)
            .fetch_all(pool)
            .await
    }
}
