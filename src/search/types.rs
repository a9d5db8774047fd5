//! Search result shapes and error definitions.

use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered chunks of a streaming search answer, open until the backend closes it.
pub type ByteStream = BoxStream<'static, Result<Bytes, SearchError>>;

/// What the backend handed back for one search call.
pub enum SearchReply {
    /// Server-sent-event bytes, relayed verbatim.
    Stream(ByteStream),
    /// Complete structured record, relayed without inspection.
    Batch(serde_json::Value),
}

impl SearchReply {
    /// Returns true if the reply exposes a byte stream.
    pub fn is_stream(&self) -> bool {
        matches!(self, SearchReply::Stream(_))
    }
}

impl std::fmt::Debug for SearchReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchReply::Stream(_) => f.write_str("SearchReply::Stream(..)"),
            SearchReply::Batch(value) => f.debug_tuple("SearchReply::Batch").field(value).finish(),
        }
    }
}

/// Errors that can occur while talking to the search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status.
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend answered 2xx but reported failure in its envelope.
    #[error("Backend reported failure: {0}")]
    Api(String),

    /// Backend payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client could not be built from its settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Batch-mode answer, as produced by AutoRAG's `ai-search`.
///
/// Every field is defaulted so partial payloads still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSearchResponse {
    pub object: String,
    pub search_query: String,
    /// Generated answer text.
    pub response: String,
    /// Sources, ordered by the backend.
    pub data: Vec<SearchResultItem>,
    pub has_more: bool,
    pub next_page: Option<String>,
}

/// One retrieved source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResultItem {
    pub file_id: String,
    pub filename: String,
    pub score: f64,
    /// Free-form metadata (`modified_date`, `folder`, ...).
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub content: Vec<ContentFragment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFragment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}
