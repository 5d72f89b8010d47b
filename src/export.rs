use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use log::info;
use regex::Regex;

use crate::config::CsvDialect;
use crate::state::{SearchResponse, SearchResult};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub const CSV_HEADERS: [&str; 5] = [
    "Rank",
    "Filename",
    "Similarity Score",
    "Confidence",
    "Matches",
];

#[derive(Clone, Debug, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
}

impl CsvExport {
    pub fn write_into(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {:?}", dir))?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)
            .with_context(|| format!("writing {:?}", path))?;
        info!("Exported results to {:?}", path);
        Ok(path)
    }
}

/// `search_results_<query>.csv`, whitespace runs folded to `_`.
pub fn suggested_filename(query: &str) -> String {
    format!("search_results_{}.csv", WHITESPACE_RUN.replace_all(query, "_"))
}

fn row(result: &SearchResult) -> [String; 5] {
    [
        result.rank.to_string(),
        result.filename.clone(),
        result.similarity_score.to_string(),
        result.confidence_percentage.clone(),
        result.num_query_matches.to_string(),
    ]
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ResultExporter {
    dialect: CsvDialect,
}

impl ResultExporter {
    pub fn new(dialect: CsvDialect) -> Self {
        Self { dialect }
    }

    /// `Ok(None)` when there is no result set to export.
    pub fn export_csv(
        &self,
        results: Option<&SearchResponse>,
        query: &str,
    ) -> Result<Option<CsvExport>> {
        let Some(response) = results else {
            return Ok(None);
        };
        let contents = match self.dialect {
            CsvDialect::Quoted => quoted_csv(&response.results)?,
            CsvDialect::Legacy => legacy_csv(&response.results),
        };
        Ok(Some(CsvExport {
            filename: suggested_filename(query),
            contents,
        }))
    }
}

fn quoted_csv(results: &[SearchResult]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for result in results {
        writer.write_record(row(result))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("failed to flush csv: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

// Unquoted on purpose: byte-compatible with the web client's download.
fn legacy_csv(results: &[SearchResult]) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];
    lines.extend(results.iter().map(|r| row(r).join(",")));
    lines.join("\n")
}
