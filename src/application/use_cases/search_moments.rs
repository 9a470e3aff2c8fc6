use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::services::search_service::{SearchOutcome, SearchService};
use crate::application::use_cases::errors::SearchError;

#[derive(Debug, Clone)]
pub struct SearchMomentsRequest {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub limit: Option<i64>,
    pub threshold: Option<f64>,
}

pub struct SearchMomentsUseCase {
    access_control: Arc<AccessControl>,
    search_service: Arc<SearchService>,
}

impl SearchMomentsUseCase {
    pub fn new(access_control: Arc<AccessControl>, search_service: Arc<SearchService>) -> Self {
        Self {
            access_control,
            search_service,
        }
    }

    pub async fn execute(&self, request: SearchMomentsRequest) -> Result<SearchOutcome, SearchError> {
        self.access_control
            .require_access(request.project_id, request.user_id)
            .await?;

        Ok(self
            .search_service
            .search(
                request.project_id,
                Some(request.user_id),
                &request.query,
                request.limit,
                request.threshold,
            )
            .await?)
    }
}
