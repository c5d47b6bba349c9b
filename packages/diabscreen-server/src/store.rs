//! Store construction from configuration

use std::sync::Arc;
use tracing::info;

use diabscreen_core::config::{StoreBackend, StoreConfig};
use diabscreen_storage::{
    ExpertStore, InMemoryExpertStore, Result, SqliteExpertStore, StorageError,
};

/// Open the configured backend, seeding an empty vocabulary
pub fn open(config: &StoreConfig) -> Result<Arc<dyn ExpertStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(InMemoryExpertStore::with_seed_data()))
        }
        StoreBackend::Sqlite => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| StorageError::invalid_input("sqlite store needs a path"))?;
            let store = SqliteExpertStore::open(path)?;
            if store.seed()? {
                info!("seeded default symptoms and recommendations");
            }
            Ok(Arc::new(store))
        }
    }
}
