use std::sync::Arc;

use uuid::Uuid;

use crate::application::use_cases::errors::ProjectError;
use crate::domain::entities::Project;
use crate::domain::repositories::ProjectRepository;

/// Projects a user owns or was invited into.
pub struct ListProjectsUseCase {
    project_repository: Arc<dyn ProjectRepository>,
}

impl ListProjectsUseCase {
    pub fn new(project_repository: Arc<dyn ProjectRepository>) -> Self {
        Self { project_repository }
    }

    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Project>, ProjectError> {
        Ok(self.project_repository.find_accessible(user_id).await?)
    }
}
