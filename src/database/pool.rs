use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connect the single application pool from DATABASE_URL.
pub async fn connect() -> Result<PgPool, DatabaseError> {
    let url =
        std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let cfg = &config::config().database;
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
        .connect(&url)
        .await?;

    info!("Connected database pool ({} max connections)", cfg.max_connections);
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
