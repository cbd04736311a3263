//! # File Store
//!
//! This module implements a file-based persistent response store. Each response
//! is written to a single file named after the SHA-256 digest of its
//! lower-cased URL. `clear` removes the whole cache directory and recreates it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io;
use tracing::{debug, warn};
use url::Url;

use crate::cache::providers::ResponseStore;
use crate::cache::types::CachedResponse;
use crate::request::{RequestIdentity, ResponseMeta};

/// On-disk form of a cached response
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    url: String,
    status: u16,
    /// Header names with base64-encoded raw values
    headers: Vec<(String, String)>,
    cached_at: u64,
    /// Base64-encoded body
    body: String,
}

impl CacheEnvelope {
    fn from_response(response: &CachedResponse) -> Self {
        let headers = response
            .meta
            .headers
            .iter()
            .map(|(name, value)| (name.as_str().to_owned(), BASE64.encode(value.as_bytes())))
            .collect();

        Self {
            url: response.meta.url.to_string(),
            status: response.meta.status.as_u16(),
            headers,
            cached_at: response.cached_at,
            body: BASE64.encode(&response.body),
        }
    }

    fn into_response(self) -> io::Result<CachedResponse> {
        let url = Url::parse(&self.url).map_err(invalid_data)?;
        let status = StatusCode::from_u16(self.status).map_err(invalid_data)?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in self.headers {
            let name = name.parse::<HeaderName>().map_err(invalid_data)?;
            let value = BASE64.decode(value.as_bytes()).map_err(invalid_data)?;
            let value = HeaderValue::from_bytes(&value).map_err(invalid_data)?;
            headers.append(name, value);
        }

        let body = BASE64.decode(self.body.as_bytes()).map_err(invalid_data)?;

        Ok(CachedResponse {
            body: Bytes::from(body),
            meta: ResponseMeta::new(url, status, headers),
            cached_at: self.cached_at,
        })
    }
}

fn invalid_data(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

/// Response store keeping one file per identity in a directory
#[derive(Debug)]
pub struct FileStore {
    cache_dir: PathBuf,
    temp_counter: AtomicU64,
}

impl FileStore {
    /// Open a file store, creating the cache directory and its parents if needed
    pub async fn open(cache_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).await?;
        debug!(dir = ?cache_dir, "File store ready");

        Ok(Self {
            cache_dir,
            temp_counter: AtomicU64::new(0),
        })
    }

    /// Directory holding the cached responses
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the path for a cached response
    pub fn entry_path(&self, identity: &RequestIdentity) -> PathBuf {
        self.cache_dir.join(identity.to_filename())
    }

    // Unique per write so concurrent puts for one identity never share a temp file.
    fn temp_path(&self, entry_path: &Path) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let mut name = entry_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.{n}.tmp", std::process::id()));
        entry_path.with_file_name(name)
    }

    async fn write_entry(&self, path: &Path, response: &CachedResponse) -> io::Result<()> {
        let envelope = CacheEnvelope::from_response(response);
        let json = serde_json::to_vec(&envelope).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to serialize cache entry: {e}"),
            )
        })?;

        // Write to a temporary file first, then rename over the entry
        let temp_path = self.temp_path(path);
        if let Err(e) = fs::write(&temp_path, &json).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        Ok(())
    }
}

#[async_trait]
impl ResponseStore for FileStore {
    async fn get(&self, identity: &RequestIdentity) -> Option<CachedResponse> {
        let path = self.entry_path(identity);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read cache file");
                return None;
            }
        };

        let decoded = serde_json::from_slice::<CacheEnvelope>(&bytes)
            .map_err(invalid_data)
            .and_then(CacheEnvelope::into_response);

        match decoded {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to parse cache file, treating as miss");

                match fs::remove_file(&path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => warn!(path = ?path, error = %e, "Failed to remove invalid cache file"),
                }

                None
            }
        }
    }

    async fn put(&self, identity: &RequestIdentity, response: CachedResponse) {
        let path = self.entry_path(identity);

        match self.write_entry(&path, &response).await {
            Ok(()) => debug!(key = %identity, path = ?path, "Cached response to file"),
            Err(e) => warn!(key = %identity, path = ?path, error = %e, "Failed to cache file"),
        }
    }

    async fn remove(&self, identity: &RequestIdentity) {
        let path = self.entry_path(identity);

        match fs::remove_file(&path).await {
            Ok(()) => debug!(key = %identity, "Removed cache file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(key = %identity, path = ?path, error = %e, "Failed to uncache file"),
        }
    }

    async fn clear(&self) {
        match fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(dir = ?self.cache_dir, error = %e, "Failed to remove cache directory");
            }
        }

        match fs::create_dir_all(&self.cache_dir).await {
            Ok(()) => debug!(dir = ?self.cache_dir, "File store cleared"),
            Err(e) => {
                warn!(dir = ?self.cache_dir, error = %e, "Failed to recreate cache directory")
            }
        }
    }
}
