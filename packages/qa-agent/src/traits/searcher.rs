//! Web search trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SearchError;
use crate::types::{SearchHit, SearchRequest};

/// Web search service.
///
/// Returns hits ranked by the provider; the pipeline never re-ranks them.
/// Errors are absorbed by the search stage, so implementations should
/// report failures rather than retry indefinitely.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError>;
}

#[async_trait]
impl<T: WebSearcher + ?Sized> WebSearcher for Arc<T> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        (**self).search(request).await
    }
}
