use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::config::{Config, TimeoutConfig};
use crate::state::{HealthStatus, ReloadOutcome, SearchRequest, SearchResponse};

/// The remote search service as seen by the controllers.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn health(&self) -> Result<HealthStatus>;
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
    async fn reload(&self) -> Result<ReloadOutcome>;
    fn backend_id(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub health_timeout: Duration,
    pub search_timeout: Duration,
    pub reload_timeout: Duration,
}

impl HttpBackendConfig {
    pub fn new(base_url: &str, timeouts: &TimeoutConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout: timeouts.health(),
            search_timeout: timeouts.search(),
            reload_timeout: timeouts.reload(),
        }
    }

    pub fn from_config(config: &Config, cli_override: Option<&str>) -> Self {
        Self::new(&config.resolve_api_base(cli_override), &config.timeouts)
    }
}

pub struct HttpBackend {
    config: HttpBackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

async fn read_json<T: DeserializeOwned>(
    what: &str,
    sent: std::result::Result<reqwest::Response, reqwest::Error>,
) -> Result<T> {
    let response = sent.map_err(|e| {
        if e.is_timeout() {
            anyhow!("{} request timed out: {}", what, e)
        } else {
            anyhow!("{} request failed: {}", what, e)
        }
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("{} returned {}: {}", what, status, body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| anyhow!("{}: failed to parse response: {}", what, e))
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn health(&self) -> Result<HealthStatus> {
        let sent = self
            .client
            .get(self.url("/health"))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.config.health_timeout)
            .send()
            .await;
        read_json("Health check", sent).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        debug!(
            "POST /search query=\"{}\" top_k={} threshold={} enhance={}",
            request.query, request.top_k, request.threshold, request.use_enhancement
        );
        let sent = self
            .client
            .post(self.url("/search"))
            .header(ACCEPT, "application/json")
            .json(request)
            .timeout(self.config.search_timeout)
            .send()
            .await;
        read_json("Search", sent).await
    }

    async fn reload(&self) -> Result<ReloadOutcome> {
        let sent = self
            .client
            .post(self.url("/admin/reload"))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.config.reload_timeout)
            .send()
            .await;
        read_json("Reload", sent).await
    }

    fn backend_id(&self) -> String {
        format!("http:{}", self.config.base_url)
    }
}
