use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::File;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::FileHash;

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn save(&self, file: &File) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<File>, RepositoryError>;
    async fn find_by_hash(
        &self,
        project_id: Uuid,
        hash: &FileHash,
    ) -> Result<Option<File>, RepositoryError>;
    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<File>, RepositoryError>;
    async fn update(&self, file: &File) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
