//! # Response Store
//!
//! This module defines the trait every response store implements.

use async_trait::async_trait;

use crate::cache::types::CachedResponse;
use crate::request::RequestIdentity;

/// A key/value store of captured responses.
///
/// Stores never fail their callers. Caching only saves network round trips, so
/// an unreadable entry is reported as absent and write or removal failures are
/// logged and dropped.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Get the response stored for an identity
    async fn get(&self, identity: &RequestIdentity) -> Option<CachedResponse>;

    /// Store a response, replacing any previous one for the identity
    async fn put(&self, identity: &RequestIdentity, response: CachedResponse);

    /// Remove the response stored for an identity
    async fn remove(&self, identity: &RequestIdentity);

    /// Remove every stored response
    async fn clear(&self);

    /// Check if the store holds a response for the identity
    async fn contains(&self, identity: &RequestIdentity) -> bool {
        self.get(identity).await.is_some()
    }
}
