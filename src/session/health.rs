use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{debug, error};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::SearchBackend;
use crate::notify::{NotificationKind, Notifier};
use crate::state::HealthStatus;

#[derive(Default)]
struct Snapshot {
    fetch: u64,
    status: HealthStatus,
}

/// Latest health snapshot of the service, refreshed on a timer and on demand.
#[derive(Clone)]
pub struct HealthMonitor {
    backend: Arc<dyn SearchBackend>,
    notifier: Notifier,
    issued: Arc<AtomicU64>,
    snapshot: Arc<Mutex<Snapshot>>,
}

impl HealthMonitor {
    pub fn new(backend: Arc<dyn SearchBackend>, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            issued: Arc::new(AtomicU64::new(0)),
            snapshot: Arc::new(Mutex::new(Snapshot::default())),
        }
    }

    pub async fn snapshot(&self) -> HealthStatus {
        self.snapshot.lock().await.status.clone()
    }

    /// Replaces the snapshot on success. On failure the previous snapshot
    /// stays and a `ConnectionError` is emitted.
    pub async fn fetch_health(&self) -> Result<HealthStatus> {
        let fetch = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        match self.backend.health().await {
            Ok(status) => {
                let mut guard = self.snapshot.lock().await;
                // a slower, older fetch must not overwrite a newer one
                if fetch > guard.fetch {
                    guard.fetch = fetch;
                    guard.status = status.clone();
                }
                debug!("Health refreshed: {:?}", status.status);
                Ok(status)
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                self.notifier.emit(NotificationKind::ConnectionError);
                Err(e)
            }
        }
    }

    /// Fetches every `every`, first one interval from now, until the
    /// returned handle is dropped. The start-up fetch is the caller's.
    pub fn start_polling(&self, every: Duration) -> PollHandle {
        let monitor = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = monitor.fetch_health().await;
            }
        });
        debug!("Health polling started every {:?}", every);
        PollHandle { task }
    }
}

pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(self) {}

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
