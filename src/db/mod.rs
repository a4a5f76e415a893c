// Database Module
// Record store for observations: configuration, pools, schema and backends

pub mod config;
pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod traits;

// Re-exports
pub use config::{CaptureConfig, Config, DatabaseConfig, DatabaseType};
pub use connection::DatabasePool;
pub use memory::InMemoryObservationStore;
pub use migrations::run_migrations;
pub use models::*;
pub use repositories::ObservationRepositoryImpl;
pub use traits::*;

use std::sync::Arc;

/// Open the configured database, apply migrations and return a store handle
pub async fn open_store(config: &DatabaseConfig) -> crate::Result<Arc<ObservationRepositoryImpl>> {
    let pool = DatabasePool::new(config).await?;

    run_migrations(&pool).await?;

    Ok(Arc::new(ObservationRepositoryImpl::new(pool)))
}
