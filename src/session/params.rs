use crate::config::SearchDefaults;
use crate::state::SearchRequest;

pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 20;
pub const MIN_THRESHOLD: f64 = 0.0;
pub const MAX_THRESHOLD: f64 = 0.6;

#[derive(Clone, Debug, PartialEq)]
pub struct SearchParameters {
    pub query: String,
    pub top_k: u32,
    pub threshold: f64,
    pub use_enhancement: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: 5,
            threshold: 0.2,
            use_enhancement: true,
        }
    }
}

impl SearchParameters {
    /// `None` when the query is empty after trimming.
    pub fn to_request(&self) -> Option<SearchRequest> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        Some(SearchRequest {
            query: query.to_string(),
            top_k: self.top_k,
            threshold: self.threshold,
            use_enhancement: self.use_enhancement,
        })
    }
}

/// Current search configuration. Setters clamp into range; nothing here
/// starts a search.
#[derive(Clone, Debug, Default)]
pub struct ParameterStore {
    params: SearchParameters,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: &SearchDefaults) -> Self {
        let mut store = Self::new();
        store.set_top_k(defaults.top_k);
        store.set_threshold(defaults.threshold);
        store.set_use_enhancement(defaults.use_enhancement);
        store
    }

    pub fn query(&self) -> &str {
        &self.params.query
    }

    pub fn top_k(&self) -> u32 {
        self.params.top_k
    }

    pub fn threshold(&self) -> f64 {
        self.params.threshold
    }

    pub fn use_enhancement(&self) -> bool {
        self.params.use_enhancement
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.params.query = query.into();
    }

    pub fn set_top_k(&mut self, top_k: i64) {
        self.params.top_k = top_k.clamp(i64::from(MIN_TOP_K), i64::from(MAX_TOP_K)) as u32;
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        if threshold.is_nan() {
            return;
        }
        self.params.threshold = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    }

    pub fn set_use_enhancement(&mut self, enabled: bool) {
        self.params.use_enhancement = enabled;
    }

    pub fn snapshot(&self) -> SearchParameters {
        self.params.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Edit {
        TopK(i64),
        Threshold(f64),
        Enhance(bool),
        Query(String),
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            any::<i64>().prop_map(Edit::TopK),
            any::<f64>().prop_map(Edit::Threshold),
            any::<bool>().prop_map(Edit::Enhance),
            ".{0,12}".prop_map(Edit::Query),
        ]
    }

    proptest! {
        #[test]
        fn test_ranges_hold_after_any_edits(edits in proptest::collection::vec(edit(), 0..40)) {
            let mut store = ParameterStore::new();
            for e in edits {
                match e {
                    Edit::TopK(v) => store.set_top_k(v),
                    Edit::Threshold(v) => store.set_threshold(v),
                    Edit::Enhance(v) => store.set_use_enhancement(v),
                    Edit::Query(v) => store.set_query(v),
                }
                prop_assert!((MIN_TOP_K..=MAX_TOP_K).contains(&store.top_k()));
                prop_assert!((MIN_THRESHOLD..=MAX_THRESHOLD).contains(&store.threshold()));
            }
        }
    }

    #[test]
    fn test_session_defaults() {
        let params = ParameterStore::new().snapshot();
        assert_eq!(params.top_k, 5);
        assert!((params.threshold - 0.2).abs() < f64::EPSILON);
        assert!(params.use_enhancement);
        assert!(params.query.is_empty());
    }

    #[test]
    fn test_clamping_edges() {
        let mut store = ParameterStore::new();
        store.set_top_k(0);
        assert_eq!(store.top_k(), 1);
        store.set_top_k(-7);
        assert_eq!(store.top_k(), 1);
        store.set_top_k(21);
        assert_eq!(store.top_k(), 20);
        store.set_threshold(0.9);
        assert!((store.threshold() - 0.6).abs() < f64::EPSILON);
        store.set_threshold(-0.1);
        assert_eq!(store.threshold(), 0.0);
        store.set_threshold(f64::INFINITY);
        assert!((store.threshold() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_threshold_ignored() {
        let mut store = ParameterStore::new();
        store.set_threshold(0.35);
        store.set_threshold(f64::NAN);
        assert!((store.threshold() - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_defaults_clamps_config_values() {
        let defaults = SearchDefaults { top_k: 100, threshold: 0.05, use_enhancement: false };
        let store = ParameterStore::with_defaults(&defaults);
        assert_eq!(store.top_k(), 20);
        assert!((store.threshold() - 0.05).abs() < f64::EPSILON);
        assert!(!store.use_enhancement());
    }

    #[test]
    fn test_to_request_trims_and_rejects_blank() {
        let mut store = ParameterStore::new();
        store.set_query("  \t ");
        assert!(store.snapshot().to_request().is_none());

        store.set_query("  red car ");
        let request = store.snapshot().to_request().unwrap();
        assert_eq!(request.query, "red car");
        assert_eq!(request.top_k, 5);
    }
}
