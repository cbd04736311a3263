//! # Cache Types
//!
//! This module defines common types used across the caching system.

use std::path::PathBuf;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::request::ResponseMeta;

/// Name of the directory used for the disk store when no path is configured
pub const DEFAULT_CACHE_DIR_NAME: &str = "url_cache";

/// Where a response was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Resource found in cache
    Hit,
    /// Resource not found in cache and fetched from the network
    Miss,
}

/// Which response store backs the caching layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StoreKind {
    /// In-process store, lost on exit
    Memory,
    /// One file per response in a cache directory
    #[default]
    Disk,
    /// Memory store in front of the disk store
    Tiered,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::Disk => write!(f, "disk"),
            StoreKind::Tiered => write!(f, "tiered"),
        }
    }
}

/// A captured response. Never mutated; a re-fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// Response body
    pub body: Bytes,
    /// Status, headers and final URL of the response
    pub meta: ResponseMeta,
    /// When the response was captured, in seconds since the Unix epoch
    pub cached_at: u64,
}

impl CachedResponse {
    /// Capture a response now
    pub fn new(body: Bytes, meta: ResponseMeta) -> Self {
        Self {
            body,
            meta,
            cached_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }

    /// Split into the body and metadata handed back to callers
    pub fn into_parts(self) -> (Bytes, ResponseMeta) {
        (self.body, self.meta)
    }
}

/// Configuration for the cache system
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Store implementation
    pub store: StoreKind,
    /// Path for disk cache storage
    pub disk_cache_path: Option<PathBuf>,
}

impl CacheConfig {
    /// Directory used by the disk store, falling back to the system temp dir
    pub fn resolved_disk_path(&self) -> PathBuf {
        self.disk_cache_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CACHE_DIR_NAME))
    }
}
