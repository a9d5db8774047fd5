//! Cloudflare AutoRAG client.
//!
//! # Responsibilities
//! - Call `POST {base}/accounts/{account}/autorag/rags/{rag}/ai-search`
//! - Relay SSE bytes untouched in streaming mode
//! - Unwrap the `{success, result, errors}` envelope in batch mode
//!
//! # Security
//! - The API token comes ONLY from the environment
//! - The token is never logged

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;

use crate::config::{SearchConfig, TimeoutConfig};
use crate::search::backend::SearchBackend;
use crate::search::options::SearchOptions;
use crate::search::types::{SearchError, SearchReply, SearchResult};

/// Upstream error bodies are cut to this many characters before logging.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// AutoRAG REST client.
#[derive(Clone)]
pub struct AutoRagClient {
    http: reqwest::Client,
    base_url: Url,
    account_id: String,
    api_token: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for AutoRagClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoRagClient")
            .field("base_url", &self.base_url.as_str())
            .field("account_id", &self.account_id)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl AutoRagClient {
    /// Create a client with an explicit API token.
    pub fn new(
        search: &SearchConfig,
        timeouts: &TimeoutConfig,
        api_token: impl Into<String>,
    ) -> SearchResult<Self> {
        if search.account_id.trim().is_empty() {
            return Err(SearchError::Config("search.account_id is not set".into()));
        }

        let base_url = Url::parse(&search.api_base_url).map_err(|e| {
            SearchError::Config(format!("Invalid API base URL '{}': {}", search.api_base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::Config(format!(
                "API base URL '{}' cannot carry a path",
                search.api_base_url
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;

        tracing::info!(
            base_url = %base_url,
            account_id = %search.account_id,
            "AutoRAG client initialized"
        );

        Ok(Self {
            http,
            base_url,
            account_id: search.account_id.clone(),
            api_token: api_token.into(),
            request_timeout: Duration::from_secs(timeouts.request_secs),
        })
    }

    /// Create a client, reading the API token from `search.api_token_env`.
    pub fn from_env(search: &SearchConfig, timeouts: &TimeoutConfig) -> SearchResult<Self> {
        let api_token = std::env::var(&search.api_token_env).map_err(|_| {
            SearchError::Config(format!(
                "Environment variable {} not set",
                search.api_token_env
            ))
        })?;
        Self::new(search, timeouts, api_token)
    }

    /// Endpoint for `ai-search` on the given RAG instance.
    pub fn endpoint(&self, rag_name: &str) -> SearchResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::Config("API base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.account_id.as_str(),
                "autorag",
                "rags",
                rag_name,
                "ai-search",
            ]);
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for AutoRagClient {
    async fn ai_search(&self, rag_name: &str, options: &SearchOptions) -> SearchResult<SearchReply> {
        let url = self.endpoint(rag_name)?;

        tracing::debug!(rag = %rag_name, stream = options.stream, "Calling AutoRAG ai-search");

        let mut request = self
            .http
            .post(url)
            .bearer_auth(&self.api_token)
            .json(options);
        if !options.stream {
            request = request.timeout(self.request_timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        if options.stream && is_event_stream(response.headers()) {
            let stream = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(SearchError::from))
                .boxed();
            return Ok(SearchReply::Stream(stream));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        envelope.into_result().map(SearchReply::Batch)
    }
}

fn is_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("text/event-stream"))
        .unwrap_or(false)
}

/// Cloudflare v4 API response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl ApiEnvelope {
    fn into_result(self) -> SearchResult<serde_json::Value> {
        if self.success == Some(false) {
            let messages = self
                .errors
                .iter()
                .map(|e| match e.code {
                    Some(code) => format!("{} ({})", e.message, code),
                    None => e.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SearchError::Api(messages));
        }
        self.result
            .ok_or_else(|| SearchError::Decode("envelope has no result".into()))
    }
}
