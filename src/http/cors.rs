//! Cross-origin headers.
//!
//! The same three headers go on every response, success or failure, and
//! never change for the lifetime of the process.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// The fixed header set as (name, value) pairs.
pub fn headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
    ]
}

/// Insert the header set, replacing any existing values.
pub fn apply(map: &mut HeaderMap) {
    for (name, value) in headers() {
        map.insert(name, value);
    }
}

/// Attach the header set to a response.
pub fn with_cors(mut response: Response) -> Response {
    apply(response.headers_mut());
    response
}

/// Layers that add the header set to framework-generated responses
/// (timeouts, body-limit rejections) that never reach the handler.
pub fn fallback_layers() -> [SetResponseHeaderLayer<HeaderValue>; 3] {
    headers().map(|(name, value)| SetResponseHeaderLayer::if_not_present(name, value))
}
