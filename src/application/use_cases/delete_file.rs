use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::{FileStorage, SearchCache};
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::FileError;
use crate::domain::repositories::FileRepository;

pub struct DeleteFileUseCase {
    access_control: Arc<AccessControl>,
    file_repository: Arc<dyn FileRepository>,
    file_storage: Arc<dyn FileStorage>,
    search_cache: Arc<dyn SearchCache>,
}

impl DeleteFileUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        file_repository: Arc<dyn FileRepository>,
        file_storage: Arc<dyn FileStorage>,
        search_cache: Arc<dyn SearchCache>,
    ) -> Self {
        Self {
            access_control,
            file_repository,
            file_storage,
            search_cache,
        }
    }

    pub async fn execute(&self, file_id: Uuid, user_id: Uuid) -> Result<(), FileError> {
        let file = self
            .file_repository
            .find_by_id(file_id)
            .await?
            .ok_or(FileError::NotFound(file_id))?;
        self.access_control
            .require_owner(file.project_id(), user_id)
            .await?;

        self.file_repository.delete(file_id).await?;
        // Cached hits may point at the file's moments.
        self.search_cache.invalidate_project(file.project_id());
        if let Err(e) = self.file_storage.delete_file(file_id).await {
            tracing::warn!(%file_id, error = %e, "Failed to delete stored footage");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::access_control::AccessError;
    use crate::application::testing::{
        InMemoryFileRepository, InMemoryFileStorage, InMemoryInvitationRepository,
        InMemoryProjectRepository, InMemorySearchCache, sample_file,
    };
    use crate::application::ports::search_cache::SearchCacheKey;
    use crate::domain::entities::Project;
    use crate::domain::repositories::ProjectRepository;

    #[tokio::test]
    async fn test_only_owner_deletes() {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryFileStorage::default());
        let owner = Uuid::new_v4();
        let project = Project::new(owner, "Files".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();
        let file = sample_file(project.id());
        files.save(&file).await.unwrap();
        storage.store_file(file.id(), b"data").await.unwrap();

        let access = Arc::new(AccessControl::new(
            projects,
            Arc::new(InMemoryInvitationRepository::default()),
        ));
        let cache = Arc::new(InMemorySearchCache::default());
        let key = SearchCacheKey::new(project.id(), "first dance", 10, 0.3);
        cache.insert(key.clone(), Vec::new());

        let use_case =
            DeleteFileUseCase::new(access, files.clone(), storage.clone(), cache.clone());

        let denied = use_case.execute(file.id(), Uuid::new_v4()).await;
        assert!(matches!(denied, Err(FileError::Access(AccessError::Forbidden))));
        assert!(cache.get(&key).is_some());

        use_case.execute(file.id(), owner).await.unwrap();
        assert!(files.find_by_id(file.id()).await.unwrap().is_none());
        assert!(!storage.contains(file.id()));
        assert!(cache.get(&key).is_none());
    }
}
