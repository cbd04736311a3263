//! # Coalescing Layer
//!
//! Deduplicates simultaneous requests for the same resource. The first caller for
//! an identity starts the fetch on a spawned task and registers it; callers that
//! arrive while it is pending await the same shared result instead of issuing
//! their own request. The registration is dropped as soon as the fetch settles,
//! so a later caller starts a fresh fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::FetchError;
use crate::provider::{DataProvider, FetchResult};
use crate::request::{FetchRequest, RequestIdentity};

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;
type InFlightTable = Arc<Mutex<HashMap<RequestIdentity, InFlight>>>;

/// A pending fetch shared by every caller of one wave
struct InFlight {
    wave: u64,
    fetch: SharedFetch,
    abort: AbortHandle,
}

/// Lives inside the spawned fetch and unregisters it when dropped, whether the
/// fetch returned, panicked or was aborted.
struct InFlightGuard {
    table: InFlightTable,
    identity: RequestIdentity,
    wave: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        // Only remove our own wave
        if table
            .get(&self.identity)
            .is_some_and(|flight| flight.wave == self.wave)
        {
            table.remove(&self.identity);
        }
    }
}

pub struct CoalescingProvider {
    inner: Arc<dyn DataProvider>,
    in_flight: InFlightTable,
    next_wave: AtomicU64,
}

impl CoalescingProvider {
    pub fn new(inner: Arc<dyn DataProvider>) -> Self {
        Self {
            inner,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_wave: AtomicU64::new(0),
        }
    }

    /// Number of identities with a pending fetch
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn is_in_flight(&self, identity: &RequestIdentity) -> bool {
        self.in_flight.lock().contains_key(identity)
    }

    /// Abort the pending fetch for an identity.
    ///
    /// Every caller waiting on it receives [`FetchError::Cancelled`]. Returns
    /// `false` if nothing was in flight.
    pub fn cancel(&self, identity: &RequestIdentity) -> bool {
        let abort = self
            .in_flight
            .lock()
            .get(identity)
            .map(|flight| flight.abort.clone());

        match abort {
            Some(abort) => {
                debug!(key = %identity, "Cancelling in-flight fetch");
                abort.abort();
                true
            }
            None => false,
        }
    }

    // Check-then-register under one lock so two callers can never both start a fetch.
    fn join_or_start(&self, identity: RequestIdentity, request: &FetchRequest) -> SharedFetch {
        let mut table = self.in_flight.lock();

        if let Some(flight) = table.get(&identity) {
            debug!(key = %identity, wave = flight.wave, "Joining in-flight fetch");
            return flight.fetch.clone();
        }

        let wave = self.next_wave.fetch_add(1, Ordering::Relaxed);
        let guard = InFlightGuard {
            table: Arc::clone(&self.in_flight),
            identity: identity.clone(),
            wave,
        };

        let inner = Arc::clone(&self.inner);
        let request = request.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            inner.fetch(&request).await
        });
        let abort = task.abort_handle();

        let key = identity.to_string();
        let fetch = async move {
            match task.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Err(FetchError::Cancelled(key)),
                Err(_) => Err(FetchError::TaskPanicked(key)),
            }
        }
        .boxed()
        .shared();

        debug!(key = %identity, wave, "Starting fetch");
        table.insert(
            identity,
            InFlight {
                wave,
                fetch: fetch.clone(),
                abort,
            },
        );

        fetch
    }
}

#[async_trait]
impl DataProvider for CoalescingProvider {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        let identity = request.identity();
        self.join_or_start(identity, request).await
    }
}
