use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use log::{error, info};

use crate::client::SearchBackend;
use crate::i18n;
use crate::notify::{NotificationKind, Notifier};
use crate::session::health::HealthMonitor;
use crate::state::ReloadOutcome;

struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct ReloadController {
    backend: Arc<dyn SearchBackend>,
    notifier: Notifier,
    health: HealthMonitor,
    in_flight: Arc<AtomicUsize>,
}

impl ReloadController {
    pub fn new(backend: Arc<dyn SearchBackend>, notifier: Notifier, health: HealthMonitor) -> Self {
        Self {
            backend,
            notifier,
            health,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Asks the service to reload its index, then refreshes health.
    pub async fn reload(&self) -> Result<ReloadOutcome> {
        let guard = InFlight::enter(&self.in_flight);
        info!("Reloading index on {}", self.backend.backend_id());
        let result = self.backend.reload().await;
        drop(guard);

        match result {
            Ok(outcome) => {
                if let Some(note) = outcome.describe() {
                    info!("Reload response: {}", note);
                }
                match outcome.load_time_seconds {
                    Some(seconds) => {
                        info!("Reload complete in {:.2}s", seconds);
                        let seconds = format!("{:.2}", seconds);
                        self.notifier
                            .emit_with(NotificationKind::IndexReloaded, &[("seconds", &seconds)]);
                    }
                    None => {
                        info!("Reload complete");
                        let message =
                            i18n::ts(self.notifier.locale(), "notify_reloaded_message_untimed");
                        self.notifier.emit_message(NotificationKind::IndexReloaded, message);
                    }
                }
                // failures are reported by the monitor itself
                let _ = self.health.fetch_health().await;
                Ok(outcome)
            }
            Err(e) => {
                error!("Reload failed: {}", e);
                self.notifier.emit(NotificationKind::ReloadError);
                Err(e)
            }
        }
    }
}
