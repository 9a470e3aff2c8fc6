use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{SearchQuery, SearchResult};
use crate::domain::repositories::RepositoryError;

/// Search analytics storage.
#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn record(
        &self,
        query: &SearchQuery,
        results: &[SearchResult],
    ) -> Result<(), RepositoryError>;
    async fn find_query(&self, id: Uuid) -> Result<Option<SearchQuery>, RepositoryError>;
    async fn find_result(&self, id: Uuid) -> Result<Option<SearchResult>, RepositoryError>;
    async fn update_result(&self, result: &SearchResult) -> Result<(), RepositoryError>;
}
