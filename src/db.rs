use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::error::Result;
use crate::repository::Dialect;

/// Opens the connection pool for the configured database.
pub async fn connect(database_url: &str, dialect: Dialect) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();

    let options = match dialect {
        Dialect::Postgres => AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5)),
        // An in-memory SQLite database lives exactly as long as its single
        // connection.
        Dialect::Sqlite => AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>),
    };

    let pool = options.connect(database_url).await?;
    tracing::info!(%dialect, "Connected to database");
    Ok(pool)
}

/// Applies the schema migrations of the given dialect.
pub async fn run_migrations(pool: &AnyPool, dialect: Dialect) -> Result<()> {
    tracing::info!(%dialect, "Running database migrations...");
    match dialect {
        Dialect::Postgres => sqlx::migrate!("./migrations/postgres").run(pool).await?,
        Dialect::Sqlite => sqlx::migrate!("./migrations/sqlite").run(pool).await?,
    }
    tracing::info!("Migrations completed");
    Ok(())
}
