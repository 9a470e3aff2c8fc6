use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::use_cases::errors::ProjectError;
use crate::domain::entities::Project;

pub struct GetProjectUseCase {
    access_control: Arc<AccessControl>,
}

impl GetProjectUseCase {
    pub fn new(access_control: Arc<AccessControl>) -> Self {
        Self { access_control }
    }

    pub async fn execute(&self, project_id: Uuid, user_id: Uuid) -> Result<Project, ProjectError> {
        Ok(self
            .access_control
            .require_access(project_id, user_id)
            .await?)
    }
}
