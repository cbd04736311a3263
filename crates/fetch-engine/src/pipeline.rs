//! # Fetch Pipeline
//!
//! Assembles the layers in their fixed order: caching layer (optional) in front
//! of the coalescing layer in front of the transport. Only the caching layer
//! touches the store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::cache::{CacheStatus, CachedResponse, ResponseStore, open_store};
use crate::caching::CachingProvider;
use crate::coalesce::CoalescingProvider;
use crate::provider::{DataProvider, FetchResult};
use crate::request::{FetchRequest, RequestIdentity};
use crate::transport::HttpTransport;
use crate::{FetchError, FetcherConfig};

pub struct FetchPipeline {
    coalescing: Arc<CoalescingProvider>,
    caching: Option<CachingProvider>,
}

impl FetchPipeline {
    /// Build a pipeline over any transport, with or without a store
    pub fn new(transport: Arc<dyn DataProvider>, store: Option<Arc<dyn ResponseStore>>) -> Self {
        let coalescing = Arc::new(CoalescingProvider::new(transport));
        let caching = store.map(|store| {
            CachingProvider::new(coalescing.clone() as Arc<dyn DataProvider>, store)
        });

        Self {
            coalescing,
            caching,
        }
    }

    /// Build the HTTP client and open the configured store
    pub async fn from_config(config: &FetcherConfig) -> Result<Self, FetchError> {
        let transport = Arc::new(HttpTransport::from_config(config)?);

        let store = match &config.cache_config {
            Some(cache_config) => Some(open_store(cache_config).await?),
            None => {
                info!("Response caching disabled");
                None
            }
        };

        Ok(Self::new(transport, store))
    }

    /// The response store, if caching is enabled
    pub fn store(&self) -> Option<&Arc<dyn ResponseStore>> {
        self.caching.as_ref().map(CachingProvider::store)
    }

    /// Fetch and report where the response came from.
    ///
    /// Without a store every response is a [`CacheStatus::Miss`].
    pub async fn fetch_with_status(
        &self,
        request: &FetchRequest,
    ) -> Result<(CachedResponse, CacheStatus), FetchError> {
        match &self.caching {
            Some(caching) => caching.fetch_with_status(request).await,
            None => {
                let (body, meta) = self.coalescing.fetch(request).await?;
                Ok((CachedResponse::new(body, meta), CacheStatus::Miss))
            }
        }
    }

    pub async fn evict(&self, request: &FetchRequest) {
        if let Some(caching) = &self.caching {
            caching.evict(request).await;
        }
    }

    pub async fn evict_all(&self) {
        if let Some(caching) = &self.caching {
            caching.evict_all().await;
        }
    }

    /// Abort the pending network fetch for an identity
    pub fn cancel(&self, identity: &RequestIdentity) -> bool {
        self.coalescing.cancel(identity)
    }

    pub fn in_flight_count(&self) -> usize {
        self.coalescing.in_flight_count()
    }
}

#[async_trait]
impl DataProvider for FetchPipeline {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        match &self.caching {
            Some(caching) => caching.fetch(request).await,
            None => self.coalescing.fetch(request).await,
        }
    }
}
