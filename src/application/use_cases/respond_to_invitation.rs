use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::application::use_cases::errors::InvitationFlowError;
use crate::domain::entities::{Invitation, InvitationStatus, Project};
use crate::domain::repositories::{InvitationRepository, ProjectRepository};

#[derive(Debug, Clone)]
pub struct InvitationDetails {
    pub invitation: Invitation,
    pub project: Project,
    pub expires_at: chrono::DateTime<Utc>,
}

/// Looking up, accepting and declining project invitations.
///
/// Any signed-in user holding the token may accept; the address the
/// invitation was sent to is not compared with the user's own.
pub struct RespondToInvitationUseCase {
    invitation_repository: Arc<dyn InvitationRepository>,
    project_repository: Arc<dyn ProjectRepository>,
    ttl: Duration,
}

impl RespondToInvitationUseCase {
    pub fn new(
        invitation_repository: Arc<dyn InvitationRepository>,
        project_repository: Arc<dyn ProjectRepository>,
        ttl_days: i64,
    ) -> Self {
        Self {
            invitation_repository,
            project_repository,
            ttl: Duration::days(ttl_days),
        }
    }

    pub async fn get(&self, token: &str) -> Result<InvitationDetails, InvitationFlowError> {
        let mut invitation = self.load(token).await?;
        if invitation.expire_if_stale(Utc::now(), self.ttl) {
            self.invitation_repository.update(&invitation).await?;
        }
        self.details(invitation).await
    }

    pub async fn accept(
        &self,
        token: &str,
        user_id: Uuid,
    ) -> Result<InvitationDetails, InvitationFlowError> {
        let mut invitation = self.load(token).await?;
        let outcome = invitation.accept(user_id, Utc::now(), self.ttl);
        self.settle(&invitation, outcome).await?;

        tracing::info!(
            invitation_id = %invitation.id(),
            project_id = %invitation.project_id(),
            %user_id,
            "Invitation accepted"
        );
        self.details(invitation).await
    }

    pub async fn decline(&self, token: &str) -> Result<InvitationDetails, InvitationFlowError> {
        let mut invitation = self.load(token).await?;
        let outcome = invitation.decline(Utc::now(), self.ttl);
        self.settle(&invitation, outcome).await?;
        self.details(invitation).await
    }

    /// Persists whatever state the response left behind, including a switch
    /// to `Expired`, then reports the outcome.
    async fn settle(
        &self,
        invitation: &Invitation,
        outcome: Result<(), crate::domain::entities::InvitationError>,
    ) -> Result<(), InvitationFlowError> {
        match outcome {
            Ok(()) => {
                self.invitation_repository.update(invitation).await?;
                Ok(())
            }
            Err(e) => {
                if invitation.status() == InvitationStatus::Expired {
                    self.invitation_repository.update(invitation).await?;
                }
                Err(e.into())
            }
        }
    }

    async fn load(&self, token: &str) -> Result<Invitation, InvitationFlowError> {
        self.invitation_repository
            .find_by_token(token.trim())
            .await?
            .ok_or(InvitationFlowError::NotFound)
    }

    async fn details(&self, invitation: Invitation) -> Result<InvitationDetails, InvitationFlowError> {
        let project = self
            .project_repository
            .find_by_id(invitation.project_id())
            .await?
            .ok_or(InvitationFlowError::NotFound)?;
        let expires_at = invitation.expires_at(self.ttl);
        Ok(InvitationDetails {
            invitation,
            project,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryInvitationRepository, InMemoryProjectRepository, aged_invitation,
    };

    struct Fixture {
        use_case: RespondToInvitationUseCase,
        invitations: Arc<InMemoryInvitationRepository>,
        project: Project,
    }

    async fn fixture() -> Fixture {
        let invitations = Arc::new(InMemoryInvitationRepository::default());
        let projects = Arc::new(InMemoryProjectRepository::default());
        let project = Project::new(Uuid::new_v4(), "Kai & Noor".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();
        Fixture {
            use_case: RespondToInvitationUseCase::new(invitations.clone(), projects, 30),
            invitations,
            project,
        }
    }

    #[tokio::test]
    async fn test_accept_grants_access() {
        let fx = fixture().await;
        let invitation = aged_invitation(fx.project.id(), fx.project.owner_id(), 2);
        fx.invitations.save(&invitation).await.unwrap();
        let couple = Uuid::new_v4();

        let details = fx.use_case.accept(invitation.token(), couple).await.unwrap();

        assert_eq!(details.invitation.status(), InvitationStatus::Accepted);
        assert_eq!(details.project.id(), fx.project.id());
        assert!(fx.invitations.has_accepted(fx.project.id(), couple).await.unwrap());
    }

    #[tokio::test]
    async fn test_invitation_older_than_thirty_days_is_rejected() {
        let fx = fixture().await;
        let invitation = aged_invitation(fx.project.id(), fx.project.owner_id(), 31);
        fx.invitations.save(&invitation).await.unwrap();

        let result = fx.use_case.accept(invitation.token(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(InvitationFlowError::Expired)));
        let stored = fx
            .invitations
            .find_by_token(invitation.token())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), InvitationStatus::Expired);
    }

    #[tokio::test]
    async fn test_cannot_respond_twice() {
        let fx = fixture().await;
        let invitation = aged_invitation(fx.project.id(), fx.project.owner_id(), 0);
        fx.invitations.save(&invitation).await.unwrap();

        fx.use_case.decline(invitation.token()).await.unwrap();
        let result = fx.use_case.accept(invitation.token(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(InvitationFlowError::AlreadyResponded(s)) if s == "declined"));
    }

    #[tokio::test]
    async fn test_lookup_marks_stale_invitation_expired() {
        let fx = fixture().await;
        let invitation = aged_invitation(fx.project.id(), fx.project.owner_id(), 45);
        fx.invitations.save(&invitation).await.unwrap();

        let details = fx.use_case.get(invitation.token()).await.unwrap();
        assert_eq!(details.invitation.status(), InvitationStatus::Expired);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let fx = fixture().await;
        assert!(matches!(
            fx.use_case.get("nope").await,
            Err(InvitationFlowError::NotFound)
        ));
    }
}
