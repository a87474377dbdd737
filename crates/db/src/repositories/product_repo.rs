//! Repository for the `products` table.

use shopseo_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{Product, UpsertProduct};

/// Column list for products queries.
const COLUMNS: &str = "id, store_id, shopify_product_id, title, description, \
    handle, vendor, product_type, tags, created_at, updated_at";

/// Provides catalog sync and store-scoped lookups for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert or overwrite a product snapshot keyed by
    /// `(store_id, shopify_product_id)`. Returns the resulting row.
    pub async fn upsert(
        pool: &PgPool,
        store_id: DbId,
        input: &UpsertProduct,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (store_id, shopify_product_id, title, description,
                 handle, vendor, product_type, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT uq_products_store_shopify_id DO UPDATE SET
                title        = EXCLUDED.title,
                description  = EXCLUDED.description,
                handle       = EXCLUDED.handle,
                vendor       = EXCLUDED.vendor,
                product_type = EXCLUDED.product_type,
                tags         = EXCLUDED.tags,
                updated_at   = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(store_id)
            .bind(&input.shopify_product_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.handle)
            .bind(&input.vendor)
            .bind(&input.product_type)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    /// Find a product that belongs to `store_id`. A product of another store
    /// is reported as absent.
    pub async fn find_for_store(
        pool: &PgPool,
        store_id: DbId,
        product_id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND store_id = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(product_id)
            .bind(store_id)
            .fetch_optional(pool)
            .await
    }

    /// List a store's products ordered by id, with pagination.
    pub async fn list_for_store(
        pool: &PgPool,
        store_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE store_id = $1
             ORDER BY id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(store_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
