use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Project;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn save(&self, project: &Project) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, RepositoryError>;
    /// Projects the user owns or joined through an accepted invitation,
    /// newest first.
    async fn find_accessible(&self, user_id: Uuid) -> Result<Vec<Project>, RepositoryError>;
    async fn update(&self, project: &Project) -> Result<(), RepositoryError>;
    /// Deletes the project and, through cascading keys, everything under it.
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
