//! # Memory Store
//!
//! In-process response store backed by an unbounded Moka cache. Entries live
//! until they are removed or the process exits; there is no size limit and no
//! time-to-live.

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::cache::providers::ResponseStore;
use crate::cache::types::CachedResponse;
use crate::request::RequestIdentity;

/// Memory store implementation using Moka
#[derive(Clone)]
pub struct MemoryStore {
    cache: MokaCache<RequestIdentity, CachedResponse>,
}

impl MemoryStore {
    pub fn new() -> Self {
        // No capacity and no TTL: nothing is evicted behind the caller's back.
        // TODO: honour Cache-Control/Expires once responses carry a freshness policy.
        let cache = MokaCache::builder().build();
        Self { cache }
    }

    /// Number of stored responses
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn get(&self, identity: &RequestIdentity) -> Option<CachedResponse> {
        self.cache.get(identity).await
    }

    async fn put(&self, identity: &RequestIdentity, response: CachedResponse) {
        self.cache.insert(identity.clone(), response).await;
    }

    async fn remove(&self, identity: &RequestIdentity) {
        if self.cache.remove(identity).await.is_some() {
            debug!(key = %identity, "Removed entry from memory store");
        }
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
        debug!("Memory store cleared");
    }
}
