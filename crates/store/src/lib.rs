//! Persistence layer for BudgeIn.
//!
//! This crate provides:
//! - The `Persistence` trait with JSON-file and in-memory backends
//! - `BudgetStore`, which serializes mutations and keeps memory and disk in step
//! - `UserRepository` for registered accounts

pub mod error;
pub mod persistence;
pub mod repositories;

pub use error::StoreError;
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};
pub use repositories::{BudgetStore, UserRepository};

use std::sync::Arc;

use budgein_shared::config::{StorageBackendKind, StorageConfig};
use tracing::info;

/// Opens the configured persistence backend.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn Persistence>, StoreError> {
    match config.backend {
        StorageBackendKind::Json => {
            let backend = JsonFilePersistence::open(&config.data_dir).await?;
            info!(data_dir = %config.data_dir.display(), "Using JSON file storage");
            Ok(Arc::new(backend))
        }
        StorageBackendKind::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(MemoryPersistence::new()))
        }
    }
}
