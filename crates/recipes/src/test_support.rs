//! Canned responses standing in for the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use fetch_engine::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use fetch_engine::{DataProvider, FetchError, FetchRequest, FetchResult, ResponseMeta, StatusCode};

#[derive(Default)]
pub struct StubProvider {
    routes: HashMap<String, (StatusCode, &'static str, Bytes)>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        mut self,
        url: &str,
        status: StatusCode,
        content_type: &'static str,
        body: impl Into<Bytes>,
    ) -> Self {
        self.routes
            .insert(url.to_owned(), (status, content_type, body.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for StubProvider {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (status, content_type, body) = self
            .routes
            .get(request.url().as_str())
            .cloned()
            .ok_or_else(|| FetchError::UrlError(format!("no route for {}", request.url())))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Ok((body, ResponseMeta::new(request.url().clone(), status, headers)))
    }
}

/// Smallest PNG prefix that carries dimensions: signature plus the IHDR chunk
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend_from_slice(&13u32.to_be_bytes());
    png.extend_from_slice(b"IHDR");
    png.extend_from_slice(&width.to_be_bytes());
    png.extend_from_slice(&height.to_be_bytes());
    // bit depth, colour type, compression, filter, interlace
    png.extend_from_slice(&[8, 6, 0, 0, 0]);
    // CRC, unchecked
    png.extend_from_slice(&[0, 0, 0, 0]);
    png
}
