//! The search capability seam.

use async_trait::async_trait;

use crate::search::options::SearchOptions;
use crate::search::types::{SearchReply, SearchResult};

/// A named, pre-provisioned RAG search resource.
///
/// Implementations own retrieval, ranking and answer generation. When
/// `options.stream` is set they should answer with [`SearchReply::Stream`];
/// anything else is treated by the handler as an invalid response.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn ai_search(&self, rag_name: &str, options: &SearchOptions) -> SearchResult<SearchReply>;
}
