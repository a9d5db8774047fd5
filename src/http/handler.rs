//! Query handler.
//!
//! One stateless function per inbound call:
//! method check → body validation → search → framing by requested mode.
//! Validation failures are reported locally; everything after that funnels
//! into a single generic 500.

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use serde_json::Value;
use thiserror::Error;

use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::search::{SearchError, SearchOptions, SearchReply};

pub const INVALID_QUERY_MESSAGE: &str = "Query is required and must be a string";
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process request";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// Errors surfaced by the query handler.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Body is not JSON, or `query` is missing, empty or not a string.
    #[error("query is missing or not a string")]
    InvalidQuery,

    /// Request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    /// Request body ran past the configured limit while streaming in.
    #[error("request body exceeds the size limit")]
    PayloadTooLarge,

    /// Backend call failed.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// Backend produced no reply within the request timeout.
    #[error("search timed out after {0:?}")]
    SearchTimeout(Duration),

    /// Stream requested but the backend returned no stream.
    #[error("invalid streaming response format")]
    InvalidStreamingResponse,

    /// Batch requested but the backend returned a stream.
    #[error("unexpected stream for batch request")]
    UnexpectedStream,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        match self {
            QueryError::InvalidQuery => {
                response::error(StatusCode::BAD_REQUEST, INVALID_QUERY_MESSAGE)
            }
            QueryError::PayloadTooLarge => {
                response::text(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE_MESSAGE)
            }
            QueryError::Body(_)
            | QueryError::Search(_)
            | QueryError::SearchTimeout(_)
            | QueryError::InvalidStreamingResponse
            | QueryError::UnexpectedStream => {
                response::error(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED_MESSAGE)
            }
        }
    }
}

impl QueryError {
    /// Classify a body read failure; overflowing the body limit is a 413.
    fn from_body_error(err: axum::Error) -> Self {
        let inner = err.into_inner();
        if exceeds_length_limit(&*inner) {
            QueryError::PayloadTooLarge
        } else {
            QueryError::Body(axum::Error::new(inner))
        }
    }
}

fn exceeds_length_limit(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(err), |e| (*e).source()).any(|e| e.is::<LengthLimitError>())
}

/// A parsed inbound query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    /// Requested framing; `true` unless the caller sent a falsy `stream`.
    pub stream: bool,
}

impl QueryRequest {
    /// Parse and validate a request body.
    pub fn from_body(body: &[u8]) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Request body is not valid JSON");
            QueryError::InvalidQuery
        })?;

        let query = match value.get("query") {
            Some(Value::String(q)) if !q.is_empty() => q.clone(),
            _ => return Err(QueryError::InvalidQuery),
        };
        let stream = value.get("stream").map_or(true, is_truthy);

        Ok(Self { query, stream })
    }
}

/// Loose truthiness for `stream`: `false`, `null`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Entry point for every method on every path.
pub async fn query_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let request_id = request_id(request.headers()).to_string();

    if method == Method::OPTIONS {
        return response::empty();
    }
    if method != Method::POST {
        tracing::debug!(request_id = %request_id, method = %method, "Method not allowed");
        return response::text(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE);
    }

    match handle_query(&state, request, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                QueryError::InvalidQuery | QueryError::PayloadTooLarge => {
                    tracing::debug!(request_id = %request_id, error = %e, "Rejected query");
                }
                _ => {
                    tracing::error!(request_id = %request_id, error = %e, "Error processing request");
                }
            }
            e.into_response()
        }
    }
}

async fn handle_query(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
) -> Result<Response, QueryError> {
    // Size is bounded by the body limit layer; overflow surfaces as a read error.
    let body = to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(QueryError::from_body_error)?;
    let query = QueryRequest::from_body(&body)?;

    tracing::info!(
        request_id = %request_id,
        stream = query.stream,
        "Forwarding query to search backend"
    );

    let options = SearchOptions::fixed(query.query, query.stream);
    let reply = tokio::time::timeout(
        state.search_timeout,
        state.backend.ai_search(&state.rag_name, &options),
    )
    .await
    .map_err(|_| QueryError::SearchTimeout(state.search_timeout))??;

    match (query.stream, reply) {
        (true, SearchReply::Stream(stream)) => Ok(response::event_stream(stream)),
        (true, SearchReply::Batch(_)) => Err(QueryError::InvalidStreamingResponse),
        (false, SearchReply::Batch(value)) => Ok(response::json(StatusCode::OK, value)),
        (false, SearchReply::Stream(_)) => Err(QueryError::UnexpectedStream),
    }
}
