mod results_list;
mod settings_panel;
mod status_bar;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::client::ImageLocationResolver;
use crate::i18n::{self, Language};
use crate::notify::{Notification, NotificationReceiver, Severity};
use crate::session::{SearchOutcome, Session};
use crate::state::{HealthStatus, ReloadOutcome, SearchResponse};

pub use results_list::{render as render_results, render_metrics};
pub use settings_panel::{parse as parse_command, Command};
pub use status_bar::render as render_status;

/// Completions sent back from spawned tasks to the REPL loop.
enum AsyncResponse {
    Search(SearchOutcome),
    Health(Result<HealthStatus, String>),
    Reload(Result<ReloadOutcome, String>),
}

pub fn render_notification(notification: &Notification) -> String {
    let title = match notification.severity {
        Severity::Info => notification.title.blue().bold(),
        Severity::Destructive => notification.title.red().bold(),
    };
    format!(
        "{} {}: {}",
        notification.at.format("%H:%M:%S").to_string().dimmed(),
        title,
        notification.message
    )
}

pub struct ReplApp {
    session: Session,
    locale: Language,
    notifications: NotificationReceiver,
    async_tx: mpsc::UnboundedSender<AsyncResponse>,
    async_rx: mpsc::UnboundedReceiver<AsyncResponse>,
    // set on spawn, cleared on completion
    search_pending: bool,
    reload_pending: bool,
}

impl ReplApp {
    pub fn new(session: Session, notifications: NotificationReceiver, locale: Language) -> Self {
        let (async_tx, async_rx) = mpsc::unbounded_channel();
        Self {
            session,
            locale,
            notifications,
            async_tx,
            async_rx,
            search_pending: false,
            reload_pending: false,
        }
    }

    fn say(&self, key: &str, vars: &[(&str, &str)]) {
        println!("{}", i18n::t(self.locale, key, vars).dimmed());
    }

    fn prompt(&self) {
        print!("{} ", "visearch>".bold());
        let _ = std::io::stdout().flush();
    }

    pub async fn run(mut self) -> Result<()> {
        println!(
            "{}",
            i18n::t(self.locale, "repl_banner", &[("base", self.session.api_base())]).bold()
        );
        self.boot();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.prompt();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !self.handle_line(&line).await {
                        break;
                    }
                    self.prompt();
                }
                Some(notification) = self.notifications.recv() => {
                    println!("\n{}", render_notification(&notification));
                    self.prompt();
                }
                Some(response) = self.async_rx.recv() => {
                    self.handle_response(response).await;
                    self.prompt();
                }
            }
        }

        self.session.shutdown();
        self.say("status_goodbye", &[]);
        Ok(())
    }

    /// One health fetch for the status panel, then the periodic poll.
    fn boot(&mut self) {
        self.spawn_health();
        self.session.start();
    }

    /// Returns false when the user asked to leave.
    async fn handle_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Command::None => {}
            Command::Search(query) => {
                self.session.params.set_query(query);
                self.spawn_search();
            }
            Command::TopK(k) => {
                self.session.params.set_top_k(k);
                self.print_params();
            }
            Command::Threshold(x) => {
                self.session.params.set_threshold(x);
                self.print_params();
            }
            Command::Enhance(on) => {
                self.session.params.set_use_enhancement(on);
                self.print_params();
            }
            Command::Params => self.print_params(),
            Command::Health => self.spawn_health(),
            Command::Reload => self.spawn_reload(),
            Command::Export(dir) => self.export(dir).await,
            Command::Open(rank) => self.open(rank).await,
            Command::Help => println!("{}", settings_panel::render_help(self.locale)),
            Command::Quit => return false,
            Command::Invalid { command, value } => {
                self.say("status_invalid_value", &[("command", &command), ("value", &value)]);
            }
            Command::Unknown(command) => {
                self.say("status_unknown_command", &[("command", &command)]);
            }
        }
        true
    }

    fn print_params(&self) {
        println!("{}", settings_panel::render_params(&self.session.params, self.locale));
    }

    fn spawn_search(&mut self) {
        if self.search_pending || self.session.search.is_searching() {
            self.say("status_busy_search", &[]);
            return;
        }
        self.search_pending = true;
        self.say("status_searching", &[]);
        let search = self.session.search.clone();
        let params = self.session.params.snapshot();
        let tx = self.async_tx.clone();
        tokio::spawn(async move {
            let outcome = search.submit(&params).await;
            let _ = tx.send(AsyncResponse::Search(outcome));
        });
    }

    fn spawn_health(&self) {
        let health = self.session.health.clone();
        let tx = self.async_tx.clone();
        tokio::spawn(async move {
            let result = health.fetch_health().await.map_err(|e| e.to_string());
            let _ = tx.send(AsyncResponse::Health(result));
        });
    }

    fn spawn_reload(&mut self) {
        if self.reload_pending || self.session.reload.is_reloading() {
            self.say("status_busy_reload", &[]);
            return;
        }
        self.reload_pending = true;
        self.say("status_reloading", &[]);
        let reload = self.session.reload.clone();
        let tx = self.async_tx.clone();
        tokio::spawn(async move {
            let result = reload.reload().await.map_err(|e| e.to_string());
            let _ = tx.send(AsyncResponse::Reload(result));
        });
    }

    async fn handle_response(&mut self, response: AsyncResponse) {
        match response {
            AsyncResponse::Search(outcome) => {
                self.search_pending = false;
                debug!("Search settled: {:?}", outcome);
                if let SearchOutcome::Applied { .. } = outcome {
                    if let Some(set) = self.session.search.current_set().await {
                        println!("\n{}", render_results(&set, &self.session.images, self.locale));
                    }
                }
            }
            AsyncResponse::Health(result) => {
                // failures already arrived as a notification; show the kept snapshot
                if let Err(e) = &result {
                    debug!("Health refresh failed: {}", e);
                }
                let snapshot = self.session.health.snapshot().await;
                println!("\n{}", render_status(&snapshot, self.session.api_base(), self.locale));
            }
            AsyncResponse::Reload(result) => {
                self.reload_pending = false;
                if result.is_ok() {
                    let snapshot = self.session.health.snapshot().await;
                    let panel = render_status(&snapshot, self.session.api_base(), self.locale);
                    println!("\n{}", panel);
                }
            }
        }
    }

    async fn export(&self, dir: Option<PathBuf>) {
        match self.session.export_current(dir.as_deref()).await {
            Ok(Some(path)) => {
                let path = path.display().to_string();
                self.say("status_exported", &[("path", &path)]);
            }
            Ok(None) => self.say("status_nothing_to_export", &[]),
            Err(e) => {
                warn!("Export failed: {:#}", e);
                self.say("status_failed", &[("action", "export"), ("error", &format!("{:#}", e))]);
            }
        }
    }

    async fn open(&self, rank: u32) {
        let current = self.session.search.current().await;
        let Some(url) = image_url(current.as_ref(), rank, &self.session.images) else {
            self.say("status_unknown_rank", &[("rank", &rank.to_string())]);
            return;
        };
        self.say("status_opening", &[("url", &url)]);
        // detached so a slow launcher never stalls the prompt
        if let Err(e) = open::that_detached(&url) {
            warn!("Failed to open {}: {}", url, e);
            self.say("status_failed", &[("action", "open"), ("error", &e.to_string())]);
        }
    }
}

fn image_url(
    current: Option<&SearchResponse>,
    rank: u32,
    images: &ImageLocationResolver,
) -> Option<String> {
    current?
        .results
        .iter()
        .find(|r| r.rank == rank)
        .map(|result| images.resolve(result))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::notify::{self, NotificationKind};
    use crate::session::testing::{response, ScriptedBackend};
    use chrono::Local;

    #[tokio::test(start_paused = true)]
    async fn test_startup_fetches_health_once() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_health(Err("connection refused"));
        let (sink, notifications) = notify::channel();
        let session = Session::new(
            &Config::default(),
            "http://localhost:8000",
            backend.clone(),
            Arc::new(sink),
        );
        let mut app = ReplApp::new(session, notifications, Language::En);

        app.boot();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.health_calls(), 1);
        assert!(matches!(app.async_rx.try_recv(), Ok(AsyncResponse::Health(Err(_)))));

        let mut connection_errors = 0;
        while let Ok(notification) = app.notifications.try_recv() {
            if notification.kind == NotificationKind::ConnectionError {
                connection_errors += 1;
            }
        }
        assert_eq!(connection_errors, 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.health_calls(), 2, "poll resumes one interval later");
    }

    #[test]
    fn test_image_url_by_rank() {
        let images = ImageLocationResolver::new("http://localhost:8000");
        let current = response(&[0.4, 0.3]);
        assert_eq!(
            image_url(Some(&current), 2, &images).as_deref(),
            Some("http://localhost:8000/images/image_002.jpg")
        );
        assert_eq!(image_url(Some(&current), 9, &images), None);
        assert_eq!(image_url(None, 1, &images), None);
    }

    #[test]
    fn test_notification_line() {
        colored::control::set_override(false);
        let line = render_notification(&Notification {
            kind: NotificationKind::NoResults,
            title: "No Results".into(),
            message: "Try lowering the threshold or adjusting your query".into(),
            severity: Severity::Info,
            at: Local::now(),
        });
        assert!(line.ends_with("No Results: Try lowering the threshold or adjusting your query"));
    }
}
