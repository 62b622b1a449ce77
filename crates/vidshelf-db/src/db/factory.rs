use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use vidshelf_core::{Config, StoreBackend};

use super::memory::MemoryVideoRepository;
use super::traits::VideoRecordStore;
use super::videos::PgVideoRepository;

/// Create a record store based on the connection string scheme.
///
/// For Postgres this connects the pool and applies pending migrations.
pub async fn create_video_store(config: &Config) -> Result<Arc<dyn VideoRecordStore>> {
    let backend = config.store_backend().ok_or_else(|| {
        anyhow::anyhow!("Unsupported DATABASE_CONNECTION_STRING scheme")
    })?;

    match backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(&config.database_connection_string)
                .await
                .context("Failed to connect to database")?;

            tracing::info!(
                max_connections = config.db_max_connections,
                "Database connected successfully"
            );

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgVideoRepository::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory video store; records are lost on restart");
            Ok(Arc::new(MemoryVideoRepository::new()))
        }
    }
}
