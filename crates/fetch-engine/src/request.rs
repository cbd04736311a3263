//! # Requests and Responses
//!
//! Request descriptors accepted by the pipeline, the identity used to coalesce
//! and cache them, and the metadata returned alongside a response body.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use sha2::{Digest, Sha256};
use url::Url;

use crate::FetchError;

/// A request for a single resource.
///
/// Only `GET` requests may enter the coalescing and caching layers. Building a
/// request with another method is allowed, but asking it for its
/// [`RequestIdentity`] panics.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    url: Url,
    method: Method,
    headers: HeaderMap,
}

impl FetchRequest {
    /// Create a `GET` request for the given URL
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }

    /// Parse a URL string into a `GET` request
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        Ok(Self::get(Url::parse(url)?))
    }

    /// Replace the request method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a request header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.as_ref().parse::<HeaderName>(),
            HeaderValue::from_str(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The identity this request is coalesced and cached under.
    ///
    /// # Panics
    ///
    /// Panics if the request method is not `GET`. Only idempotent fetches may be
    /// shared between callers or replayed from a cache, so anything else is a
    /// programming error.
    pub fn identity(&self) -> RequestIdentity {
        assert!(
            self.method == Method::GET,
            "only GET supported (got {})",
            self.method
        );
        RequestIdentity(self.url.as_str().to_owned())
    }
}

/// Normalized key for a cacheable `GET` request: the full serialized URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestIdentity(String);

impl RequestIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to a fixed-length, filesystem-safe name.
    ///
    /// The locator is lower-cased before hashing, so URLs that differ only in
    /// letter case share a name.
    pub fn to_filename(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.to_lowercase().as_bytes());
        let hash = hasher.finalize();
        format!("{hash:x}")
    }
}

impl fmt::Display for RequestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response metadata delivered with every body
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            url,
            status,
            headers,
        }
    }

    /// The `Content-Type` header, if present and valid UTF-8
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}
