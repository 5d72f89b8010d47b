use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::session::params::{MAX_THRESHOLD, MAX_TOP_K, MIN_THRESHOLD, MIN_TOP_K};

fn parse_top_k(s: &str) -> Result<i64, String> {
    let val: i64 = s.parse().map_err(|_| format!("'{}' is not a whole number", s))?;
    if val < i64::from(MIN_TOP_K) || val > i64::from(MAX_TOP_K) {
        Err(format!("top-k must be between {} and {}, got {}", MIN_TOP_K, MAX_TOP_K, val))
    } else {
        Ok(val)
    }
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let val: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&val) {
        Err(format!(
            "threshold must be between {} and {}, got {}",
            MIN_THRESHOLD, MAX_THRESHOLD, val
        ))
    } else {
        Ok(val)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "visearch",
    author,
    version,
    about = "Terminal client for a remote visual image search service",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Base URL of the search service (overrides API_BASE_URL and the config file)
    #[arg(long = "api", global = true, value_name = "URL")]
    pub api: Option<String>,

    /// Path to config.json
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive session (default)
    Repl,

    /// Run one search and print the results
    Search {
        /// Text query
        query: String,

        /// Number of results (1-20)
        #[arg(short = 'k', long = "top-k", value_parser = parse_top_k)]
        top_k: Option<i64>,

        /// Minimum similarity score (0.0-0.6)
        #[arg(short = 't', long = "threshold", value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Disable server-side query enhancement
        #[arg(long = "no-enhance")]
        no_enhance: bool,

        /// Also write the results as CSV into this directory
        #[arg(long = "csv", value_name = "DIR")]
        csv: Option<PathBuf>,
    },

    /// Show the service status
    Health,

    /// Ask the service to reload its index
    Reload,
}
