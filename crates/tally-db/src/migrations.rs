//! # Schema
//!
//! The schema ships inside the binary; a fresh or missing database file is
//! brought up to date at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup ──► _sqlx_migrations exists? ──► apply pending in order        │
//! │                                                                         │
//! │      001_initial_schema.sql   products • sales • sale_items            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Schema changes go in a new numbered file; applied files are immutable.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever is pending. Safe to call on an up-to-date store.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;

    let (embedded, applied) = migration_status(pool).await?;
    info!(embedded, applied, "Schema migrated");
    Ok(())
}

/// `(embedded, applied)` migration counts.
///
/// Errors on a store that has never been migrated: the bookkeeping table
/// does not exist yet.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
