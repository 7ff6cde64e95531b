use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub async fn setup_database(config: &DatabaseConfig) -> Result<PgPool> {
    info!("Connecting to PostgreSQL");

    if !config.url.contains("sslmode=require")
        && !config.url.contains("sslmode=verify-ca")
        && !config.url.contains("sslmode=verify-full")
    {
        warn!("Database connection does not enforce SSL. Consider adding sslmode=require to connection string");
    }

    let statement_timeout = format!("SET statement_timeout = '{}s'", config.statement_timeout_secs);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(180))
        .max_lifetime(Duration::from_secs(900))
        .after_connect(move |conn, _meta| {
            let statement_timeout = statement_timeout.clone();
            Box::pin(async move {
                sqlx::query("SET timezone = 'UTC'").execute(&mut *conn).await?;
                sqlx::query(&statement_timeout).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await?;

    let start_time = std::time::Instant::now();
    sqlx::query("SELECT 1").execute(&pool).await?;
    info!(
        max_connections = config.max_connections,
        statement_timeout_secs = config.statement_timeout_secs,
        "Database connection established in {:?}",
        start_time.elapsed()
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
