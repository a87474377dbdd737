//! Persistence for stores, products, prompt preferences, and optimization
//! attempts.
//!
//! Repositories (`repositories::*Repo`) hold the SQL. The [`ShopRepository`]
//! trait is what the API layer depends on; it has a Postgres implementation
//! built on the repositories and an in-memory implementation for local runs
//! and tests.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryShopRepository;
pub use postgres::PgShopRepository;
pub use repository::ShopRepository;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
