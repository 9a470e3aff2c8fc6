use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::use_cases::errors::ProjectError;
use crate::domain::entities::{Project, ProjectChanges};
use crate::domain::repositories::ProjectRepository;

pub struct UpdateProjectUseCase {
    access_control: Arc<AccessControl>,
    project_repository: Arc<dyn ProjectRepository>,
}

impl UpdateProjectUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        project_repository: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            access_control,
            project_repository,
        }
    }

    pub async fn execute(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Project, ProjectError> {
        let mut project = self
            .access_control
            .require_owner(project_id, user_id)
            .await?;
        project
            .apply(changes)
            .map_err(ProjectError::ValidationError)?;
        self.project_repository.update(&project).await?;
        Ok(project)
    }
}
