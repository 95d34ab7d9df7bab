//! Repository for the `products` table.

use florist_core::types::EntityId;
use sqlx::PgPool;

use crate::models::product::Product;

/// Column list for `products` queries.
const COLUMNS: &str = "\
    id, name, description, price, image, product_type, is_available, stock, \
    created_at, updated_at";

/// Provides CRUD operations for catalog products.
pub struct ProductRepo;

impl ProductRepo {
    pub async fn create(pool: &PgPool, product: &Product) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products \
                (id, name, description, price, image, product_type, is_available, stock, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.product_type)
            .bind(product.is_available)
            .bind(product.stock)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All products, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// Overwrite the editable columns. Returns `None` if the product does not exist.
    pub async fn update(pool: &PgPool, product: &Product) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET \
                name = $2, description = $3, price = $4, image = $5, product_type = $6, \
                is_available = $7, stock = $8, updated_at = $9 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.product_type)
            .bind(product.is_available)
            .bind(product.stock)
            .bind(product.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while order items reference it.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
