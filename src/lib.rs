//! RAG search proxy library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod search;

pub use config::RagProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use search::{AutoRagClient, SearchBackend};
