use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Invitation;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn save(&self, invitation: &Invitation) -> Result<(), RepositoryError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, RepositoryError>;
    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Invitation>, RepositoryError>;
    async fn update(&self, invitation: &Invitation) -> Result<(), RepositoryError>;
    /// Whether `user_id` accepted an invitation to the project.
    async fn has_accepted(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, RepositoryError>;
}
