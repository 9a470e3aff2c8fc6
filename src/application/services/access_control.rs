use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::Project;
use crate::domain::repositories::{InvitationRepository, ProjectRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),
    #[error("You do not have access to this project")]
    Forbidden,
    #[error("Only the project owner can do this")]
    OwnerOnly,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Who may see and who may change a project.
///
/// The owner has full control. A couple who accepted an invitation can read
/// everything in the project and run searches and compilations, but cannot
/// modify it.
pub struct AccessControl {
    project_repository: Arc<dyn ProjectRepository>,
    invitation_repository: Arc<dyn InvitationRepository>,
}

impl AccessControl {
    pub fn new(
        project_repository: Arc<dyn ProjectRepository>,
        invitation_repository: Arc<dyn InvitationRepository>,
    ) -> Self {
        Self {
            project_repository,
            invitation_repository,
        }
    }

    pub async fn require_access(&self, project_id: Uuid, user_id: Uuid) -> Result<Project, AccessError> {
        let project = self.load(project_id).await?;
        if project.is_owned_by(user_id) {
            return Ok(project);
        }
        if self
            .invitation_repository
            .has_accepted(project_id, user_id)
            .await?
        {
            return Ok(project);
        }
        Err(AccessError::Forbidden)
    }

    pub async fn require_owner(&self, project_id: Uuid, user_id: Uuid) -> Result<Project, AccessError> {
        let project = self.load(project_id).await?;
        if project.is_owned_by(user_id) {
            Ok(project)
        } else if self
            .invitation_repository
            .has_accepted(project_id, user_id)
            .await?
        {
            Err(AccessError::OwnerOnly)
        } else {
            Err(AccessError::Forbidden)
        }
    }

    async fn load(&self, project_id: Uuid) -> Result<Project, AccessError> {
        self.project_repository
            .find_by_id(project_id)
            .await?
            .ok_or(AccessError::ProjectNotFound(project_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{InMemoryInvitationRepository, InMemoryProjectRepository};
    use crate::domain::entities::Invitation;
    use chrono::{Duration, Utc};

    async fn setup() -> (AccessControl, Arc<InMemoryInvitationRepository>, Project) {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let invitations = Arc::new(InMemoryInvitationRepository::default());
        let project = Project::new(Uuid::new_v4(), "Smith wedding".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();
        (
            AccessControl::new(projects, invitations.clone()),
            invitations,
            project,
        )
    }

    #[tokio::test]
    async fn test_owner_has_full_access() {
        let (access, _, project) = setup().await;
        assert!(access.require_access(project.id(), project.owner_id()).await.is_ok());
        assert!(access.require_owner(project.id(), project.owner_id()).await.is_ok());
    }

    #[tokio::test]
    async fn test_stranger_is_forbidden() {
        let (access, _, project) = setup().await;
        let result = access.require_access(project.id(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AccessError::Forbidden)));
    }

    #[tokio::test]
    async fn test_invited_couple_can_read_but_not_modify() {
        let (access, invitations, project) = setup().await;
        let couple = Uuid::new_v4();
        let mut invitation =
            Invitation::new(project.id(), "couple@example.com", project.owner_id(), None).unwrap();
        invitation.accept(couple, Utc::now(), Duration::days(30)).unwrap();
        invitations.save(&invitation).await.unwrap();

        assert!(access.require_access(project.id(), couple).await.is_ok());
        assert!(matches!(
            access.require_owner(project.id(), couple).await,
            Err(AccessError::OwnerOnly)
        ));
    }

    #[tokio::test]
    async fn test_missing_project() {
        let (access, _, _) = setup().await;
        let missing = Uuid::new_v4();
        assert!(matches!(
            access.require_access(missing, Uuid::new_v4()).await,
            Err(AccessError::ProjectNotFound(id)) if id == missing
        ));
    }
}
