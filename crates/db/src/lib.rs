//! Persistence for the avatar service.
//!
//! - [`database::Database`] -- connection facade over SQLite or PostgreSQL,
//!   selected at startup from [`config::DatabaseConfig`].
//! - [`repositories`] -- SQL for the `avatars` table.
//! - [`file_store::FileStore`] -- PNG payloads on disk.
//! - [`store::AvatarStore`] -- metadata and payload kept in step.

pub mod config;
pub mod database;
pub mod error;
pub mod file_store;
pub mod models;
pub mod repositories;
pub mod store;

pub use config::{DatabaseConfig, Driver};
pub use database::Database;
pub use error::DbError;
pub use file_store::FileStore;
pub use store::AvatarStore;

/// Pool type shared by every driver.
pub type DbPool = sqlx::AnyPool;

/// Run a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
