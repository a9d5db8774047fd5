//! Query-shaping options sent with every search.
//!
//! The proxy narrows the backend's option surface to a fixed subset; callers
//! only choose the query text and the framing mode.

use serde::Serialize;

/// Backend may rephrase the query before retrieval.
pub const REWRITE_QUERY: bool = true;

/// Cap on the number of source documents considered.
pub const MAX_NUM_RESULTS: u32 = 5;

/// Matches scoring below this are discarded by the backend.
pub const SCORE_THRESHOLD: f64 = 0.3;

/// Options for one `ai-search` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOptions {
    pub query: String,
    pub rewrite_query: bool,
    pub max_num_results: u32,
    pub ranking_options: RankingOptions,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingOptions {
    pub score_threshold: f64,
}

impl SearchOptions {
    /// Build the fixed option set for `query`, mirroring the caller's mode.
    pub fn fixed(query: impl Into<String>, stream: bool) -> Self {
        Self {
            query: query.into(),
            rewrite_query: REWRITE_QUERY,
            max_num_results: MAX_NUM_RESULTS,
            ranking_options: RankingOptions {
                score_threshold: SCORE_THRESHOLD,
            },
            stream,
        }
    }
}
