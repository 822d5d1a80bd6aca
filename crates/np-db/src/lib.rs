#[cfg(test)]
mod fixtures;
pub mod models;
pub mod repositories;

use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    Sqlite, SqlitePool,
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Create a SQLite connection pool.
///
/// An in-memory database only lives as long as its connection, so a
/// `:memory:` URL gets a single connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url '{database_url}'"))?
        .foreign_keys(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Ensure the database exists and run migrations in this crate's `migrations/` folder.
pub async fn ensure_db_and_migrate(database_url: &str, pool: &SqlitePool) -> anyhow::Result<()> {
    // In-memory databases exist as soon as the pool connects
    if !is_in_memory(database_url) {
        let exists = Sqlite::database_exists(database_url).await?;
        if !exists {
            Sqlite::create_database(database_url).await?;
        }
    }

    // Run migrations bundled at compile time from `migrations/`
    sqlx::migrate!().run(pool).await?;

    Ok(())
}

/// Fresh, migrated in-memory database. Used by tests and local experiments.
pub async fn in_memory_pool() -> anyhow::Result<SqlitePool> {
    let url = "sqlite::memory:";
    let pool = create_pool(url, 1).await?;
    ensure_db_and_migrate(url, &pool).await?;
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
