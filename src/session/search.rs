use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Mutex;

use crate::client::SearchBackend;
use crate::notify::{NotificationKind, Notifier};
use crate::session::params::SearchParameters;
use crate::state::{SearchMetrics, SearchRequest, SearchResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query, nothing was sent.
    Rejected,
    Applied { count: usize },
    Failed,
    /// A newer search was issued while this one was in flight.
    Stale,
}

#[derive(Clone, Debug)]
pub struct ResultSet {
    pub request: SearchRequest,
    pub response: SearchResponse,
}

/// Marks a search as settled when dropped, whichever way it ended.
struct SettleGuard {
    settled: Arc<AtomicU64>,
    generation: u64,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.settled.fetch_max(self.generation, Ordering::SeqCst);
    }
}

/// Issues searches and owns the current result set. Only the response of the
/// most recently issued search is ever applied.
#[derive(Clone)]
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    notifier: Notifier,
    issued: Arc<AtomicU64>,
    settled: Arc<AtomicU64>,
    current: Arc<Mutex<Option<ResultSet>>>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            issued: Arc::new(AtomicU64::new(0)),
            settled: Arc::new(AtomicU64::new(0)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// True until the newest issued search has settled.
    pub fn is_searching(&self) -> bool {
        self.settled.load(Ordering::SeqCst) < self.issued.load(Ordering::SeqCst)
    }

    pub async fn current(&self) -> Option<SearchResponse> {
        self.current.lock().await.as_ref().map(|set| set.response.clone())
    }

    pub async fn current_set(&self) -> Option<ResultSet> {
        self.current.lock().await.clone()
    }

    pub async fn metrics(&self) -> Option<SearchMetrics> {
        self.current.lock().await.as_ref().map(|set| set.response.metrics())
    }

    pub async fn submit(&self, params: &SearchParameters) -> SearchOutcome {
        let Some(request) = params.to_request() else {
            self.notifier.emit(NotificationKind::ValidationError);
            return SearchOutcome::Rejected;
        };

        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _settle = SettleGuard {
            settled: self.settled.clone(),
            generation,
        };
        debug!("Search #{} for \"{}\"", generation, request.query);

        let result = self.backend.search(&request).await;

        let mut current = self.current.lock().await;
        let newest = self.issued.load(Ordering::SeqCst);
        if generation != newest {
            debug!("Discarding stale search #{} (newest #{})", generation, newest);
            return SearchOutcome::Stale;
        }

        match result {
            Ok(response) => {
                let count = response.results.len();
                info!(
                    "Search #{} returned {} results in {:.1}ms",
                    generation, count, response.timing_ms
                );
                *current = Some(ResultSet { request, response });
                drop(current);
                if count == 0 {
                    self.notifier.emit(NotificationKind::NoResults);
                }
                SearchOutcome::Applied { count }
            }
            Err(e) => {
                drop(current);
                error!("Search failed: {}", e);
                self.notifier.emit(NotificationKind::SearchError);
                SearchOutcome::Failed
            }
        }
    }
}
