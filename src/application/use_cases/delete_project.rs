use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::ProjectError;
use crate::domain::repositories::{FileRepository, ProjectRepository};

/// Deletes a project. Rows under it go with it through cascading keys; the
/// stored footage is removed here.
pub struct DeleteProjectUseCase {
    access_control: Arc<AccessControl>,
    project_repository: Arc<dyn ProjectRepository>,
    file_repository: Arc<dyn FileRepository>,
    file_storage: Arc<dyn FileStorage>,
}

impl DeleteProjectUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        project_repository: Arc<dyn ProjectRepository>,
        file_repository: Arc<dyn FileRepository>,
        file_storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            access_control,
            project_repository,
            file_repository,
            file_storage,
        }
    }

    pub async fn execute(&self, project_id: Uuid, user_id: Uuid) -> Result<(), ProjectError> {
        self.access_control
            .require_owner(project_id, user_id)
            .await?;

        let files = self.file_repository.find_by_project(project_id).await?;
        self.project_repository.delete(project_id).await?;

        for file in files {
            if let Err(e) = self.file_storage.delete_file(file.id()).await {
                tracing::warn!(file_id = %file.id(), error = %e, "Failed to delete stored footage");
            }
        }

        tracing::info!(%project_id, "Project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryFileRepository, InMemoryFileStorage, InMemoryInvitationRepository,
        InMemoryProjectRepository, sample_file,
    };
    use crate::domain::entities::Project;

    #[tokio::test]
    async fn test_delete_removes_project_and_footage() {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryFileStorage::default());
        let access = Arc::new(AccessControl::new(
            projects.clone(),
            Arc::new(InMemoryInvitationRepository::default()),
        ));
        let owner = Uuid::new_v4();
        let project = Project::new(owner, "Gone".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();
        let file = sample_file(project.id());
        files.save(&file).await.unwrap();
        storage.store_file(file.id(), b"frames").await.unwrap();

        DeleteProjectUseCase::new(access, projects.clone(), files, storage.clone())
            .execute(project.id(), owner)
            .await
            .unwrap();

        assert!(projects.find_by_id(project.id()).await.unwrap().is_none());
        assert!(!storage.contains(file.id()));
    }
}
