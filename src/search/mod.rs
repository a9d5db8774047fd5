//! External search capability.
//!
//! # Data Flow
//! ```text
//! Validated query
//!     → options.rs (fixed query-shaping parameters)
//!     → backend.rs (SearchBackend trait, injected into the handler)
//!     → autorag.rs (Cloudflare AutoRAG REST client)
//!     → SearchReply::Stream (SSE bytes) | SearchReply::Batch (JSON record)
//! ```
//!
//! # Design Decisions
//! - Retrieval, ranking and answer generation belong to the backend
//! - The handler only sees the trait, so tests substitute an in-process mock
//! - Batch payloads stay opaque JSON; typed mirrors exist for consumers only

pub mod autorag;
pub mod backend;
pub mod options;
pub mod types;

pub use autorag::AutoRagClient;
pub use backend::SearchBackend;
pub use options::{RankingOptions, SearchOptions};
pub use types::{
    AiSearchResponse, ByteStream, ContentFragment, SearchError, SearchReply, SearchResult,
    SearchResultItem,
};
