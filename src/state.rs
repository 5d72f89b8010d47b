use serde::{Deserialize, Serialize};

/// Point-in-time record of backend readiness and index statistics.
///
/// Every field is optional: the service may omit any of them, and a snapshot
/// that was never fetched has none.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub embedding_dim: Option<u32>,
    #[serde(default)]
    pub vectors_indexed: Option<u64>,
    #[serde(default)]
    pub total_images: Option<u64>,
    #[serde(default)]
    pub index_type: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

impl HealthStatus {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The panel treats a known model as "connected".
    pub fn is_operational(&self) -> bool {
        self.model.is_some()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub rank: u32,
    pub filename: String,
    pub image_path: String,
    pub similarity_score: f64,
    pub confidence_percentage: String,
    pub num_query_matches: u32,
}

/// One complete answer from `/search`. The order of `results` is the
/// backend's and is never changed on the client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub timing_ms: f64,
    #[serde(default)]
    pub enhanced_queries: Option<Vec<String>>,
}

impl SearchResponse {
    pub fn metrics(&self) -> SearchMetrics {
        SearchMetrics::from(self)
    }

    pub fn enhanced_line(&self) -> Option<String> {
        self.enhanced_queries
            .as_ref()
            .map(|queries| queries.join(", "))
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: u32,
    pub threshold: f64,
    pub use_enhancement: bool,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ReloadOutcome {
    #[serde(default)]
    pub load_time_seconds: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ReloadOutcome {
    /// The service's own `status: message`, when it sent either.
    pub fn describe(&self) -> Option<String> {
        match (&self.status, &self.message) {
            (Some(status), Some(message)) => Some(format!("{}: {}", status, message)),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchMetrics {
    pub timing_ms: f64,
    pub top1_score: Option<f64>,
    pub average_score: Option<f64>,
    pub count: usize,
}

impl From<&SearchResponse> for SearchMetrics {
    fn from(response: &SearchResponse) -> Self {
        let count = response.results.len();
        let top1_score = response.results.first().map(|r| r.similarity_score);
        let average_score = if count == 0 {
            None
        } else {
            let sum: f64 = response.results.iter().map(|r| r.similarity_score).sum();
            Some(sum / count as f64)
        };
        Self {
            timing_ms: response.timing_ms,
            top1_score,
            average_score,
            count,
        }
    }
}

impl SearchMetrics {
    pub fn timing_label(&self) -> String {
        format!("{:.1}", self.timing_ms)
    }

    pub fn top1_label(&self) -> String {
        score_label(self.top1_score)
    }

    pub fn average_label(&self) -> String {
        score_label(self.average_score)
    }
}

fn score_label(score: Option<f64>) -> String {
    format!("{:.3}", score.unwrap_or(0.0))
}

/// `24943` -> `24,943`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
