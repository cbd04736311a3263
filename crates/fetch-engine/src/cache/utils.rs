//! # Cache Utilities
//!
//! Helpers for building a response store from configuration.

use std::sync::Arc;

use tokio::io;
use tracing::info;

use crate::cache::manager::TieredStore;
use crate::cache::providers::{FileStore, MemoryStore, ResponseStore};
use crate::cache::types::{CacheConfig, StoreKind};

/// Open the response store described by a cache configuration
pub async fn open_store(config: &CacheConfig) -> io::Result<Arc<dyn ResponseStore>> {
    let store: Arc<dyn ResponseStore> = match config.store {
        StoreKind::Memory => {
            info!("Using in-memory response cache");
            Arc::new(MemoryStore::new())
        }
        StoreKind::Disk => {
            let dir = config.resolved_disk_path();
            info!(dir = ?dir, "Using on-disk response cache");
            Arc::new(FileStore::open(dir).await?)
        }
        StoreKind::Tiered => {
            let dir = config.resolved_disk_path();
            info!(dir = ?dir, "Using tiered (memory + disk) response cache");
            Arc::new(TieredStore::new(
                Arc::new(MemoryStore::new()),
                Arc::new(FileStore::open(dir).await?),
            ))
        }
    };

    Ok(store)
}
