//! # Database Persistence
//!
//! Optional PostgreSQL persistence behind the in-memory stores. The pool
//! is constructed from `DATABASE_URL` at startup; when the variable is
//! absent the API runs in in-memory-only mode and every function here is
//! simply never called.
//!
//! One module per table. The lifecycle write path goes through
//! [`complaints::persist_transition`], which pairs the complaint row
//! update with the municipality counter increment in a single
//! transaction.

pub mod complaints;
pub mod municipalities;
pub mod states;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Initialize the connection pool from `DATABASE_URL`.
///
/// Returns `Ok(None)` when the variable is unset — in-memory-only mode —
/// and an error when it is set but the database is unreachable, so a
/// misconfigured deployment fails fast instead of silently dropping
/// durability.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::info!("DATABASE_URL not set — running in in-memory-only mode");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;
    tracing::info!("connected to PostgreSQL");
    Ok(Some(pool))
}

/// Apply the schema. Idempotent (`CREATE TABLE IF NOT EXISTS`); called
/// once at startup when a pool is available.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}
