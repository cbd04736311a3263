//! # Tiered Store
//!
//! A memory store in front of a file store. Reads check memory first and
//! promote file hits into memory; writes and removals go to both tiers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::providers::{FileStore, MemoryStore, ResponseStore};
use crate::cache::types::CachedResponse;
use crate::request::RequestIdentity;

#[derive(Clone)]
pub struct TieredStore {
    memory: Arc<MemoryStore>,
    file: Arc<FileStore>,
}

impl TieredStore {
    pub fn new(memory: Arc<MemoryStore>, file: Arc<FileStore>) -> Self {
        Self { memory, file }
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn file(&self) -> &FileStore {
        &self.file
    }
}

#[async_trait]
impl ResponseStore for TieredStore {
    async fn get(&self, identity: &RequestIdentity) -> Option<CachedResponse> {
        if let Some(response) = self.memory.get(identity).await {
            return Some(response);
        }

        let response = self.file.get(identity).await?;
        debug!(key = %identity, "Promoting file store hit into memory");
        self.memory.put(identity, response.clone()).await;
        Some(response)
    }

    async fn put(&self, identity: &RequestIdentity, response: CachedResponse) {
        self.memory.put(identity, response.clone()).await;
        self.file.put(identity, response).await;
    }

    async fn remove(&self, identity: &RequestIdentity) {
        self.memory.remove(identity).await;
        self.file.remove(identity).await;
    }

    async fn clear(&self) {
        self.memory.clear().await;
        self.file.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{FetchRequest, ResponseMeta};
    use bytes::Bytes;
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use tempfile::tempdir;

    fn identity(url: &str) -> RequestIdentity {
        FetchRequest::parse(url).unwrap().identity()
    }

    fn response(url: &str, body: &'static [u8]) -> CachedResponse {
        let meta = ResponseMeta::new(url.parse().unwrap(), StatusCode::OK, HeaderMap::new());
        CachedResponse::new(Bytes::from_static(body), meta)
    }

    async fn tiered(dir: &std::path::Path) -> TieredStore {
        TieredStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FileStore::open(dir).await.unwrap()),
        )
    }

    #[tokio::test]
    async fn test_put_writes_both_tiers() {
        let dir = tempdir().unwrap();
        let store = tiered(dir.path()).await;
        let url = "https://example.com/a.jpg";

        store.put(&identity(url), response(url, b"a")).await;

        assert!(store.memory().contains(&identity(url)).await);
        assert!(store.file().contains(&identity(url)).await);
    }

    #[tokio::test]
    async fn test_file_hit_is_promoted() {
        let dir = tempdir().unwrap();
        let url = "https://example.com/b.jpg";
        FileStore::open(dir.path())
            .await
            .unwrap()
            .put(&identity(url), response(url, b"b"))
            .await;

        let store = tiered(dir.path()).await;
        assert!(!store.memory().contains(&identity(url)).await);

        let hit = store.get(&identity(url)).await.expect("file tier hit");
        assert_eq!(hit.body, Bytes::from_static(b"b"));
        assert!(store.memory().contains(&identity(url)).await);
    }

    #[tokio::test]
    async fn test_remove_and_clear_apply_to_both_tiers() {
        let dir = tempdir().unwrap();
        let store = tiered(dir.path()).await;
        let a = "https://example.com/a.jpg";
        let b = "https://example.com/b.jpg";

        store.put(&identity(a), response(a, b"a")).await;
        store.put(&identity(b), response(b, b"b")).await;

        store.remove(&identity(a)).await;
        assert!(store.get(&identity(a)).await.is_none());
        assert!(store.get(&identity(b)).await.is_some());

        store.clear().await;
        assert!(!store.memory().contains(&identity(b)).await);
        assert!(!store.file().contains(&identity(b)).await);
    }
}
