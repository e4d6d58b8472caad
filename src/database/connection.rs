//! Conexión a PostgreSQL

use anyhow::Result;
use sqlx::PgPool;

use crate::config::database::DatabaseConfig;

/// Crear el pool de conexiones a partir del entorno
pub async fn create_pool() -> Result<PgPool> {
    let config = DatabaseConfig::from_env();
    let pool = config.create_pool().await?;

    Ok(pool)
}
