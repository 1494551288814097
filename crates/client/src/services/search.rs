//! Debounced product typeahead.
//!
//! Each keystroke restarts a debounce timer and aborts whatever request
//! was in flight; aborting the task drops the reqwest future, which
//! cancels the request. A generation counter marks the most recently
//! issued query, and completed responses are published only when their
//! generation still matches, so a slow early response can never overwrite
//! a fast later one. Results flow to subscribers over a `watch` channel;
//! every non-superseded query publishes exactly once, with a failed
//! request publishing an empty result set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::instrument;

use clementine_core::ProductSummary;

use crate::api::ApiClient;

/// A published search result set.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// The query these results answer.
    pub query: String,
    /// Matching products, capped at the configured limit.
    pub products: Vec<ProductSummary>,
}

/// Debounced product search.
///
/// Cheaply cloneable; all clones share the same debounce timer and result
/// channel. Dropping the last clone aborts any in-flight request.
#[derive(Clone)]
pub struct ProductSearch {
    inner: Arc<SearchInner>,
}

struct SearchInner {
    api: ApiClient,
    debounce: Duration,
    limit: u32,
    /// Shared with spawned tasks so they can detect being superseded
    /// without keeping the whole service alive.
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
    results: watch::Sender<SearchResults>,
}

impl ProductSearch {
    /// Create a search box over the shared API client.
    #[must_use]
    pub fn new(api: ApiClient, debounce: Duration, limit: u32) -> Self {
        let (results, _) = watch::channel(SearchResults::default());
        Self {
            inner: Arc::new(SearchInner {
                api,
                debounce,
                limit,
                generation: Arc::new(AtomicU64::new(0)),
                task: Mutex::new(None),
                results,
            }),
        }
    }

    /// Subscribe to published results.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.inner.results.subscribe()
    }

    /// The last published results.
    #[must_use]
    pub fn current(&self) -> SearchResults {
        self.inner.results.borrow().clone()
    }

    /// Handle an input change.
    ///
    /// Restarts the debounce timer; the previous pending request (if any)
    /// is aborted. An empty query publishes empty results immediately.
    #[instrument(skip(self), fields(query = %query))]
    pub fn set_query(&self, query: &str) {
        let issued = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(mut task) = self.inner.task.lock()
            && let Some(previous) = task.take()
        {
            previous.abort();
        }

        let query = query.trim().to_owned();
        if query.is_empty() {
            let _ = self.inner.results.send(SearchResults::default());
            return;
        }

        let api = self.inner.api.clone();
        let debounce = self.inner.debounce;
        let limit = self.inner.limit;
        let generation = Arc::clone(&self.inner.generation);
        let results = self.inner.results.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            if generation.load(Ordering::SeqCst) != issued {
                return; // superseded while waiting
            }

            let outcome = api.search_products(&query, limit).await;

            if generation.load(Ordering::SeqCst) != issued {
                tracing::debug!("Discarding stale search response");
                return;
            }

            // A failed request still publishes (an empty set): subscribers
            // awaiting this query must not pend forever.
            let products = outcome.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Product search failed");
                Vec::new()
            });
            let _ = results.send(SearchResults { query, products });
        });

        if let Ok(mut task) = self.inner.task.lock() {
            *task = Some(handle);
        }
    }
}

impl Drop for SearchInner {
    fn drop(&mut self) {
        // Unmount: cancel any in-flight request
        if let Ok(mut task) = self.task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }
}
