use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use dotenv::dotenv;
use slotsync_api::config::{ApiConfig, StoreBackend};
use slotsync_core::store::{DurableStore, MemoryStore};
use slotsync_db::{PgStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    let store: Arc<dyn DurableStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL must be set for the postgres backend"))?;

            // Create database connection pool
            let db_pool = create_pool(database_url)
                .await
                .wrap_err("Failed to connect to the database")?;

            // Initialize database schema
            initialize_database(&db_pool).await?;

            Arc::new(PgStore::new(db_pool))
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    // Start API server
    slotsync_api::start_server(config, store).await?;

    Ok(())
}
