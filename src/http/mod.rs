//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handler.rs (method check, body validation, search call)
//!     → response.rs (framing + CORS)
//!     → Send to client
//! ```

pub mod cors;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{query_handler, QueryError, QueryRequest};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
