//! # Data Provider
//!
//! The capability every pipeline layer implements: turn a request into a body and
//! its response metadata. Layers wrap each other through this trait, so a real
//! transport and a test double are interchangeable.

use async_trait::async_trait;
use bytes::Bytes;

use crate::FetchError;
use crate::request::{FetchRequest, ResponseMeta};

/// Result of a fetch: the response body and its metadata
pub type FetchResult = Result<(Bytes, ResponseMeta), FetchError>;

/// Performs a data fetch for a request
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult;
}
