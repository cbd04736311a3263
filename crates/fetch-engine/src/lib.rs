//! # Fetch Engine
//!
//! A layered HTTP fetch pipeline for idempotent `GET` requests.
//!
//! ## Layers
//!
//! - [`CachingProvider`]: serves stored responses and stores fresh ones
//! - [`CoalescingProvider`]: shares one network fetch between concurrent callers
//! - [`HttpTransport`]: the `reqwest`-backed network call
//!
//! Every layer implements [`DataProvider`], so consumers only depend on the trait.
//! [`FetchPipeline`] wires the layers together from a [`FetcherConfig`].
//!
//! ## Stores
//!
//! Responses are kept in a [`MemoryStore`], a [`FileStore`] (one file per
//! response, named by the SHA-256 of the lower-cased URL) or a [`TieredStore`]
//! combining both.

pub mod cache;
pub mod caching;
pub mod coalesce;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod proxy;
pub mod request;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use cache::{
    CacheConfig, CacheStatus, CachedResponse, FileStore, MemoryStore, ResponseStore, StoreKind,
    TieredStore, open_store,
};
pub use caching::CachingProvider;
pub use coalesce::CoalescingProvider;
pub use config::{FetcherConfig, FetcherConfigBuilder};
pub use error::FetchError;
pub use pipeline::FetchPipeline;
pub use provider::{DataProvider, FetchResult};
pub use request::{FetchRequest, RequestIdentity, ResponseMeta};
pub use transport::{HttpTransport, create_client};

pub use proxy::{ProxyAuth, ProxyConfig};

pub use reqwest::{Method, StatusCode, header};
