//! Per-session client state: one instance of each controller, each owning
//! only the state it mutates.

pub mod health;
pub mod params;
pub mod reload;
pub mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;

use crate::client::{ImageLocationResolver, SearchBackend};
use crate::config::Config;
use crate::export::ResultExporter;
use crate::notify::{NotificationSink, Notifier};

pub use health::{HealthMonitor, PollHandle};
pub use params::{ParameterStore, SearchParameters};
pub use reload::ReloadController;
pub use search::{ResultSet, SearchController, SearchOutcome};

pub struct Session {
    pub params: ParameterStore,
    pub health: HealthMonitor,
    pub search: SearchController,
    pub reload: ReloadController,
    pub exporter: ResultExporter,
    pub images: ImageLocationResolver,
    api_base: String,
    export_dir: Option<PathBuf>,
    poll_interval: Duration,
    poller: Option<PollHandle>,
}

impl Session {
    pub fn new(
        config: &Config,
        api_base: &str,
        backend: Arc<dyn SearchBackend>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let notifier = Notifier::new(sink, config.language());
        let health = HealthMonitor::new(backend.clone(), notifier.clone());
        Self {
            params: ParameterStore::with_defaults(&config.defaults),
            search: SearchController::new(backend.clone(), notifier.clone()),
            reload: ReloadController::new(backend, notifier, health.clone()),
            health,
            exporter: ResultExporter::new(config.export.dialect),
            images: ImageLocationResolver::new(api_base),
            api_base: api_base.trim_end_matches('/').to_string(),
            export_dir: config.export.directory.clone(),
            poll_interval: config.health_poll_interval(),
            poller: None,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Starts (or restarts) the health poll. The first poll lands one
    /// interval from now; front ends fetch once themselves at start-up.
    pub fn start(&mut self) {
        self.poller = Some(self.health.start_polling(self.poll_interval));
    }

    pub fn shutdown(&mut self) {
        if self.poller.take().is_some() {
            info!("Health polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(PollHandle::is_running)
    }

    pub async fn submit_search(&self) -> SearchOutcome {
        self.search.submit(&self.params.snapshot()).await
    }

    /// Writes the current result set as CSV, named after the query that
    /// produced it. `Ok(None)` without results.
    pub async fn export_current(&self, dir: Option<&Path>) -> Result<Option<PathBuf>> {
        let Some(set) = self.search.current_set().await else {
            return Ok(None);
        };
        let Some(export) = self.exporter.export_csv(Some(&set.response), &set.request.query)? else {
            return Ok(None);
        };
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| self.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        export.write_into(&dir).map(Some)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::client::SearchBackend;
    use crate::state::{HealthStatus, ReloadOutcome, SearchRequest, SearchResponse, SearchResult};

    type Scripted<T> = Result<T, &'static str>;

    /// In-memory backend answering from queues; empty queues give a benign
    /// default answer.
    #[derive(Default)]
    pub struct ScriptedBackend {
        health: Mutex<VecDeque<Scripted<HealthStatus>>>,
        search: Mutex<VecDeque<(Duration, Scripted<SearchResponse>)>>,
        reload: Mutex<VecDeque<Scripted<ReloadOutcome>>>,
        reload_delay: Mutex<Duration>,
        health_calls: AtomicUsize,
        search_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        pub fn push_health(&self, answer: Scripted<HealthStatus>) {
            self.health.lock().unwrap().push_back(answer);
        }

        pub fn push_search(&self, delay: Duration, answer: Scripted<SearchResponse>) {
            self.search.lock().unwrap().push_back((delay, answer));
        }

        pub fn push_reload(&self, answer: Scripted<ReloadOutcome>) {
            self.reload.lock().unwrap().push_back(answer);
        }

        pub fn set_reload_delay(&self, delay: Duration) {
            *self.reload_delay.lock().unwrap() = delay;
        }

        pub fn health_calls(&self) -> usize {
            self.health_calls.load(Ordering::SeqCst)
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn health(&self) -> Result<HealthStatus> {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.health.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(healthy("default", 0)))
                .map_err(|e| anyhow!(e))
        }

        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.search.lock().unwrap().pop_front();
            let (delay, answer) = next.unwrap_or((Duration::ZERO, Ok(response(&[]))));
            tokio::time::sleep(delay).await;
            answer.map_err(|e| anyhow!(e))
        }

        async fn reload(&self) -> Result<ReloadOutcome> {
            let delay = *self.reload_delay.lock().unwrap();
            let next = self.reload.lock().unwrap().pop_front();
            tokio::time::sleep(delay).await;
            next.unwrap_or_else(|| {
                Ok(ReloadOutcome {
                    load_time_seconds: Some(1.0),
                    status: Some("success".into()),
                    message: None,
                })
            })
            .map_err(|e| anyhow!(e))
        }

        fn backend_id(&self) -> String {
            "scripted".to_string()
        }
    }

    pub fn healthy(model: &str, vectors: u64) -> HealthStatus {
        HealthStatus {
            status: Some("healthy".into()),
            model: Some(model.into()),
            embedding_dim: Some(512),
            vectors_indexed: Some(vectors),
            total_images: Some(vectors),
            index_type: Some("IndexFlatIP".into()),
            device: Some("cpu".into()),
        }
    }

    /// Ranks 1..=n in the given score order.
    pub fn response(scores: &[f64]) -> SearchResponse {
        SearchResponse {
            results: scores
                .iter()
                .enumerate()
                .map(|(i, score)| SearchResult {
                    rank: i as u32 + 1,
                    filename: format!("image_{:03}.jpg", i + 1),
                    image_path: format!("/images/image_{:03}.jpg", i + 1),
                    similarity_score: *score,
                    confidence_percentage: format!("{:.1}%", score * 100.0),
                    num_query_matches: 1,
                })
                .collect(),
            timing_ms: 25.0,
            enhanced_queries: None,
        }
    }
}
