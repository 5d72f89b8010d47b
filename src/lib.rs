pub mod cli;
pub mod client;
pub mod config;
pub mod export;
pub mod i18n;
pub mod notify;
pub mod session;
pub mod state;
pub mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, info};

use cli::{Cli, Command};
use client::{HttpBackend, HttpBackendConfig, SearchBackend};
use config::Config;
use notify::LogSink;
use session::{SearchOutcome, Session};

pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("visearch_lib", level)
        .filter_module("visearch", level)
        .parse_default_env()
        .init();
}

/// Loads the config, builds the session and runs the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);
    let backend_config = HttpBackendConfig::from_config(&config, cli.api.as_deref());
    let api_base = backend_config.base_url.clone();
    info!(
        "Using search service at {} (locale {})",
        api_base,
        config.language().code()
    );
    let backend: Arc<dyn SearchBackend> = Arc::new(HttpBackend::new(backend_config));

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let (sink, notifications) = notify::channel();
            let session = Session::new(&config, &api_base, backend, Arc::new(sink));
            ui::ReplApp::new(session, notifications, config.language())
                .run()
                .await
        }
        Command::Search {
            query,
            top_k,
            threshold,
            no_enhance,
            csv,
        } => {
            let mut session = Session::new(&config, &api_base, backend, Arc::new(LogSink));
            session.params.set_query(query);
            if let Some(k) = top_k {
                session.params.set_top_k(k);
            }
            if let Some(x) = threshold {
                session.params.set_threshold(x);
            }
            if no_enhance {
                session.params.set_use_enhancement(false);
            }
            run_search(&session, &config, csv).await
        }
        Command::Health => {
            let session = Session::new(&config, &api_base, backend, Arc::new(LogSink));
            let result = session.health.fetch_health().await;
            let snapshot = session.health.snapshot().await;
            println!("{}", ui::render_status(&snapshot, session.api_base(), config.language()));
            result.map(|_| ())
        }
        Command::Reload => {
            let session = Session::new(&config, &api_base, backend, Arc::new(LogSink));
            session.reload.reload().await?;
            let snapshot = session.health.snapshot().await;
            println!("{}", ui::render_status(&snapshot, session.api_base(), config.language()));
            Ok(())
        }
    }
}

async fn run_search(session: &Session, config: &Config, csv: Option<PathBuf>) -> Result<()> {
    match session.submit_search().await {
        SearchOutcome::Applied { count } => {
            debug!("{} results", count);
            if let Some(set) = session.search.current_set().await {
                println!("{}", ui::render_results(&set, &session.images, config.language()));
            }
            if let Some(dir) = csv {
                if let Some(path) = session.export_current(Some(&dir)).await? {
                    println!("{}", path.display());
                }
            }
            Ok(())
        }
        SearchOutcome::Rejected => Err(anyhow!("empty query")),
        SearchOutcome::Failed => Err(anyhow!("search failed")),
        SearchOutcome::Stale => Err(anyhow!("search was superseded")),
    }
}
