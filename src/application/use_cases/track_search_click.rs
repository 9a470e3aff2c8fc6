use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::use_cases::errors::SearchError;
use crate::domain::entities::SearchResult;
use crate::domain::repositories::SearchRepository;

/// Marks a search result as opened by the user.
pub struct TrackSearchClickUseCase {
    access_control: Arc<AccessControl>,
    search_repository: Arc<dyn SearchRepository>,
}

impl TrackSearchClickUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        search_repository: Arc<dyn SearchRepository>,
    ) -> Self {
        Self {
            access_control,
            search_repository,
        }
    }

    pub async fn execute(&self, result_id: Uuid, user_id: Uuid) -> Result<SearchResult, SearchError> {
        let mut result = self
            .search_repository
            .find_result(result_id)
            .await?
            .ok_or(SearchError::ResultNotFound(result_id))?;
        let query = self
            .search_repository
            .find_query(result.search_query_id())
            .await?
            .ok_or(SearchError::ResultNotFound(result_id))?;
        self.access_control
            .require_access(query.project_id(), user_id)
            .await?;

        if !result.clicked() {
            result.mark_clicked();
            self.search_repository.update_result(&result).await?;
        }
        Ok(result)
    }
}
