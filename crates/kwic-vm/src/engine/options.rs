//! Search configuration.

use serde::{Deserialize, Serialize};

/// Tunables of one search.
///
/// Deserializable so front ends can read it from a file; missing fields take
/// their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    /// Longest match, in positions, the engine tries to extend (default: 1000).
    pub max_match_length: usize,
    /// Also report matches nested inside a reported match (default: false).
    pub nested_results: bool,
    /// Reservoir-sample the results with this seed instead of stopping when
    /// the buffer fills up (default: off).
    pub sample_seed: Option<u64>,
    /// Prune the search with the positional index when the corpus has one
    /// (default: true).
    pub use_index: bool,
    /// Values accepting more symbols than this do not restrict the search
    /// area (default: 200).
    pub unindex_threshold: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_match_length: 1000,
            nested_results: false,
            sample_seed: None,
            use_index: true,
            unindex_threshold: 200,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_match_length(mut self, length: usize) -> Self {
        self.max_match_length = length;
        self
    }

    pub fn nested_results(mut self, value: bool) -> Self {
        self.nested_results = value;
        self
    }

    pub fn sample_seed(mut self, seed: Option<u64>) -> Self {
        self.sample_seed = seed;
        self
    }

    pub fn use_index(mut self, value: bool) -> Self {
        self.use_index = value;
        self
    }

    pub fn unindex_threshold(mut self, threshold: usize) -> Self {
        self.unindex_threshold = threshold;
        self
    }

    #[inline]
    pub fn is_sampling(&self) -> bool {
        self.sample_seed.is_some()
    }
}
