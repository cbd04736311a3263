//! # Caching Layer
//!
//! Serves responses from a [`ResponseStore`] when it has them and otherwise
//! fetches through the wrapped provider, storing whatever comes back. Entries
//! never expire on their own; they stay until evicted or replaced.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheStatus, CachedResponse, ResponseStore};
use crate::provider::{DataProvider, FetchResult};
use crate::request::FetchRequest;
use crate::FetchError;

pub struct CachingProvider {
    remote: Arc<dyn DataProvider>,
    store: Arc<dyn ResponseStore>,
}

impl CachingProvider {
    pub fn new(remote: Arc<dyn DataProvider>, store: Arc<dyn ResponseStore>) -> Self {
        Self { remote, store }
    }

    pub fn store(&self) -> &Arc<dyn ResponseStore> {
        &self.store
    }

    /// Fetch a resource and report whether it came from the store.
    ///
    /// # Panics
    ///
    /// Panics if the request method is not `GET`.
    pub async fn fetch_with_status(
        &self,
        request: &FetchRequest,
    ) -> Result<(CachedResponse, CacheStatus), FetchError> {
        let identity = request.identity();

        if let Some(cached) = self.store.get(&identity).await {
            debug!(key = %identity, "Cache hit");
            return Ok((cached, CacheStatus::Hit));
        }

        debug!(key = %identity, "Cache miss, fetching");
        let (body, meta) = self.remote.fetch(request).await?;
        let response = CachedResponse::new(body, meta);
        self.store.put(&identity, response.clone()).await;

        Ok((response, CacheStatus::Miss))
    }

    /// Drop the stored response for a request
    pub async fn evict(&self, request: &FetchRequest) {
        let identity = request.identity();
        debug!(key = %identity, "Evicting cached response");
        self.store.remove(&identity).await;
    }

    /// Drop every stored response
    pub async fn evict_all(&self) {
        debug!("Evicting all cached responses");
        self.store.clear().await;
    }
}

#[async_trait]
impl DataProvider for CachingProvider {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        let (response, _) = self.fetch_with_status(request).await?;
        Ok(response.into_parts())
    }
}
