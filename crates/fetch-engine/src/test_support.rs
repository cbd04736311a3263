//! Test doubles for the transport seam.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use crate::FetchError;
use crate::provider::{DataProvider, FetchResult};
use crate::request::{FetchRequest, ResponseMeta};

#[inline]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// What a test transport does once it is allowed to answer
#[derive(Clone)]
pub enum Outcome {
    /// Respond 200 with a body echoing the requested URL
    Echo,
    /// Fail with the given error
    Fail(FetchError),
    /// Panic inside the fetch
    Panic,
}

/// Counts calls and optionally holds every fetch until released.
pub struct MockTransport {
    calls: AtomicUsize,
    gate: Option<Semaphore>,
    outcome: Outcome,
}

impl MockTransport {
    /// Answers immediately
    pub fn instant(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: None,
            outcome,
        })
    }

    /// Answers once per `release` call, releases made early are banked
    pub fn gated(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Some(Semaphore::new(0)),
            outcome,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }
}

pub fn echo_body(request: &FetchRequest) -> Bytes {
    Bytes::from(format!("body of {}", request.url()))
}

#[async_trait]
impl DataProvider for MockTransport {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match &self.outcome {
            Outcome::Echo => {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
                let meta = ResponseMeta::new(request.url().clone(), StatusCode::OK, headers);
                Ok((echo_body(request), meta))
            }
            Outcome::Fail(err) => Err(err.clone()),
            Outcome::Panic => panic!("transport exploded"),
        }
    }
}
