//! Request controller
//!
//! Owns the request state for one descriptor, consults the shared cache for
//! GET requests, and publishes every state change on a watch channel so views
//! can re-render.
//!
//! State moves `Idle -> Loading -> Success | Failure`. A GET whose URL is
//! already cached skips straight to `Success` without calling the transport,
//! unless the fetch is a retry. Payloads that are empty in the JSON sense
//! (`null`, `false`, `0`, `""`) are neither stored nor served from the cache.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::{is_cacheable_payload, ResponseCache};
use crate::request::RequestDescriptor;
use crate::state::RequestState;
use crate::transport::Transport;

/// State type published by a controller using transport `Tr`
pub type ControllerState<T, Tr> = RequestState<T, <Tr as Transport<T>>::Error>;

struct Inner<T, Tr: Transport<T>> {
    descriptor: RequestDescriptor,
    transport: Tr,
    cache: Arc<dyn ResponseCache<T>>,
    state: watch::Sender<ControllerState<T, Tr>>,
    /// Id of the most recently started fetch; older completions are dropped.
    /// Only changed while the watch channel's lock is held.
    sequence: AtomicU64,
    attached: AtomicBool,
}

/// Fetches one request and tracks its data, error and loading state
///
/// Cloning yields another handle to the same controller, so a retry can be
/// spawned while the view keeps reading snapshots.
pub struct RequestController<T, Tr: Transport<T>> {
    inner: Arc<Inner<T, Tr>>,
}

impl<T, Tr: Transport<T>> Clone for RequestController<T, Tr> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, Tr: Transport<T>> fmt::Debug for RequestController<T, Tr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestController")
            .field("descriptor", &self.inner.descriptor)
            .field("phase", &self.inner.state.borrow().phase())
            .finish()
    }
}

impl<T, Tr> RequestController<T, Tr>
where
    T: Clone + Serialize + Send + Sync + 'static,
    Tr: Transport<T>,
{
    /// Creates an idle controller; the descriptor is fixed from here on
    pub fn new(
        descriptor: RequestDescriptor,
        transport: Tr,
        cache: Arc<dyn ResponseCache<T>>,
    ) -> Self {
        let (state, _) = watch::channel(RequestState::idle());
        Self {
            inner: Arc::new(Inner {
                descriptor,
                transport,
                cache,
                state,
                sequence: AtomicU64::new(0),
                attached: AtomicBool::new(false),
            }),
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.inner.descriptor
    }

    /// Current data, error and loading flag
    pub fn snapshot(&self) -> ControllerState<T, Tr> {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ControllerState<T, Tr>> {
        self.inner.state.subscribe()
    }

    /// Runs the initial fetch the first time it is called
    ///
    /// # Returns
    /// * `Some(state)` - The state after the initial fetch
    /// * `None` - The controller was already attached; nothing was fetched
    pub async fn attach(&self) -> Option<ControllerState<T, Tr>> {
        if self.inner.attached.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.fetch(false).await)
    }

    /// Fetches again, bypassing the cache even for GET requests
    pub async fn retry(&self) -> ControllerState<T, Tr> {
        self.fetch(true).await
    }

    /// Fetches the request and publishes the resulting state
    ///
    /// Errors are captured into the returned state, never propagated. If
    /// another fetch on this controller starts before this one completes,
    /// this fetch's outcome is discarded and the current state is returned.
    /// The staleness check and the publish happen under the channel lock, so
    /// a discarded outcome never reaches the state or the cache.
    pub async fn fetch(&self, is_retry: bool) -> ControllerState<T, Tr> {
        let inner = &*self.inner;
        let url = inner.descriptor.url();
        let cacheable = inner.descriptor.is_cacheable();

        if !is_retry && cacheable {
            if let Some(data) = inner.cache.get(url).filter(is_cacheable_payload) {
                debug!(url, "cache hit");
                inner.state.send_modify(|current| {
                    inner.sequence.fetch_add(1, Ordering::SeqCst);
                    *current = RequestState::success(data);
                });
                return self.snapshot();
            }
            debug!(url, "cache miss");
        }

        let mut seq = 0;
        inner.state.send_modify(|current| {
            seq = inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            *current = RequestState::loading();
        });
        debug!(url, method = %inner.descriptor.method(), seq, retry = is_retry, "request started");

        let result = inner.transport.send(&inner.descriptor).await;

        let store = cacheable && matches!(&result, Ok(data) if is_cacheable_payload(data));
        let outcome = match result {
            Ok(data) => RequestState::success(data),
            Err(error) => {
                warn!(url, %error, "request failed");
                RequestState::failure(error)
            }
        };

        let published = inner.state.send_if_modified(|current| {
            if inner.sequence.load(Ordering::SeqCst) != seq {
                return false;
            }
            if let (true, Some(data)) = (store, &outcome.data) {
                inner.cache.set(url, data.clone());
            }
            *current = outcome;
            true
        });
        if !published {
            debug!(url, seq, "discarding stale response");
        }
        self.snapshot()
    }
}
