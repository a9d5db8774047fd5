//! Response framing.
//!
//! Every constructor here attaches the CORS header set, so no handler path
//! can produce a response without it.
//!
//! # Design Decisions
//! - Streaming responses relay chunks as they arrive; nothing is buffered
//! - JSON relays the backend value as-is, no typed round trip

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::cors::with_cors;
use crate::search::ByteStream;

/// Empty-bodied 200 (preflight).
pub fn empty() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// Plain-text body with the given status.
pub fn text(status: StatusCode, body: &'static str) -> Response {
    with_cors((status, body).into_response())
}

/// JSON body with the given status.
pub fn json(status: StatusCode, value: serde_json::Value) -> Response {
    with_cors((status, Json(value)).into_response())
}

/// `{"error": message}` with the given status.
pub fn error(status: StatusCode, message: &str) -> Response {
    json(status, serde_json::json!({ "error": message }))
}

/// `text/event-stream` body relaying `stream` chunk by chunk.
pub fn event_stream(stream: ByteStream) -> Response {
    let mut response = Response::new(Body::from_stream(stream));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    with_cors(response)
}
