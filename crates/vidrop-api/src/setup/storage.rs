//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use vidrop_core::Config;
use vidrop_storage::{create_storage, Storage};

/// Setup the storage backend selected by configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
