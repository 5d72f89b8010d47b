use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const API_BASE_ENV: &str = "API_BASE_URL";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// RFC 4180 quoting for fields holding a delimiter, quote or newline.
    #[default]
    Quoted,
    /// Plain comma join, no quoting, no trailing newline.
    Legacy,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchDefaults {
    #[serde(default = "default_top_k")]
    pub top_k: i64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_true")]
    pub use_enhancement: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            threshold: default_threshold(),
            use_enhancement: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeoutConfig {
    #[serde(default = "default_health_secs")]
    pub health_secs: u64,
    #[serde(default = "default_search_secs")]
    pub search_secs: u64,
    #[serde(default = "default_reload_secs")]
    pub reload_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            health_secs: default_health_secs(),
            search_secs: default_search_secs(),
            reload_secs: default_reload_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn health(&self) -> Duration {
        Duration::from_secs(self.health_secs.max(1))
    }

    pub fn search(&self) -> Duration {
        Duration::from_secs(self.search_secs.max(1))
    }

    pub fn reload(&self) -> Duration {
        Duration::from_secs(self.reload_secs.max(1))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ExportConfig {
    #[serde(default)]
    pub dialect: CsvDialect,
    /// Where `export` writes when no directory is given. Current dir if unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub defaults: SearchDefaults,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default = "default_health_poll_secs")]
    pub health_poll_secs: u64,
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_schema() -> String {
    "https://raw.githubusercontent.com/machinetherapist/visearch/main/config.schema.json"
        .to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_top_k() -> i64 {
    5
}

fn default_threshold() -> f64 {
    0.2
}

fn default_health_secs() -> u64 {
    5
}

fn default_search_secs() -> u64 {
    30
}

fn default_reload_secs() -> u64 {
    60
}

fn default_health_poll_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            api_base_url: None,
            locale: default_locale(),
            defaults: SearchDefaults::default(),
            timeouts: TimeoutConfig::default(),
            health_poll_secs: default_health_poll_secs(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    pub fn language(&self) -> Language {
        Language::from_code(&self.locale)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_secs.max(1))
    }

    /// CLI flag, then `API_BASE_URL`, then the config file, then the default.
    pub fn resolve_api_base(&self, cli_override: Option<&str>) -> String {
        let env = std::env::var(API_BASE_ENV).ok();
        pick_api_base(cli_override, env.as_deref(), self.api_base_url.as_deref())
    }
}

fn pick_api_base(cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .to_string()
}

pub fn get_app_data_dir() -> PathBuf {
    let base = std::env::var("APPDATA")
        .or_else(|_| std::env::var("XDG_DATA_HOME"))
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            format!("{}/.local/share", home)
        });
    PathBuf::from(base).join("com.visearch.app")
}

pub fn default_config_path() -> PathBuf {
    get_app_data_dir().join("config.json")
}

pub fn load_config(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!("No config found, creating default config at {:?}", config_path);
        let default = Config::default();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if let Ok(json) = serde_json::to_string_pretty(&default) {
            let _ = std::fs::write(config_path, json);
        }
        return default;
    }
    let content = std::fs::read_to_string(config_path).unwrap_or_default();
    match serde_json::from_str::<Config>(&content) {
        Ok(c) => {
            info!("Config loaded from {:?}", config_path);
            c
        }
        Err(e) => {
            warn!("Config parse failed ({}), using defaults", e);
            Config::default()
        }
    }
}
