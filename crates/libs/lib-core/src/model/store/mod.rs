//! # Database Store
//!
//! SQLite connection pool, schema bootstrap, and repository implementations.

// region: --- Modules
pub mod api_key_repository;
pub mod contact_repository;
pub mod models;
pub mod project_repository;
pub mod schema;
pub mod user_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use api_key_repository::{ApiKeyRepository, SqlCredentialStore};
pub use contact_repository::ContactRepository;
pub use project_repository::ProjectRepository;
pub use user_repository::UserRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool, creating the database file if missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

/// Single-connection in-memory pool with the schema applied. Each call is
/// an independent database.
pub async fn memory_pool() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    schema::ensure_schema(&pool).await?;
    Ok(pool)
}
// endregion: --- Types and Functions
