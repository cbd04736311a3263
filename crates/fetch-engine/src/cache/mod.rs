//! # Cache System
//!
//! Response stores used by the caching layer to skip repeated network trips:
//! an in-memory store, a one-file-per-response disk store, and a tiered store
//! combining both.

// Module declarations
mod manager;
pub mod providers;
mod types;
mod utils;

// Re-export primary types from our various modules
pub use manager::TieredStore;
pub use types::{CacheConfig, CacheStatus, CachedResponse, DEFAULT_CACHE_DIR_NAME, StoreKind};
pub use utils::open_store;

pub use providers::{FileStore, MemoryStore, ResponseStore};
