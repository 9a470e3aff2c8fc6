use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::use_cases::errors::FileError;
use crate::domain::entities::File;
use crate::domain::repositories::FileRepository;

pub struct ListFilesUseCase {
    access_control: Arc<AccessControl>,
    file_repository: Arc<dyn FileRepository>,
}

impl ListFilesUseCase {
    pub fn new(access_control: Arc<AccessControl>, file_repository: Arc<dyn FileRepository>) -> Self {
        Self {
            access_control,
            file_repository,
        }
    }

    pub async fn execute(&self, project_id: Uuid, user_id: Uuid) -> Result<Vec<File>, FileError> {
        self.access_control
            .require_access(project_id, user_id)
            .await?;
        Ok(self.file_repository.find_by_project(project_id).await?)
    }
}
