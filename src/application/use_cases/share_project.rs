use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::EmailSender;
use crate::application::ports::email_sender::EmailMessage;
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::InvitationFlowError;
use crate::domain::entities::{Invitation, Project};
use crate::domain::repositories::InvitationRepository;

#[derive(Debug, Clone)]
pub struct ShareProjectRequest {
    pub project_id: Uuid,
    pub invited_by: Uuid,
    pub email: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ShareProjectResponse {
    pub invitation: Invitation,
    pub invite_url: String,
    pub email_sent: bool,
}

/// Invites a couple to a project by email.
pub struct ShareProjectUseCase {
    access_control: Arc<AccessControl>,
    invitation_repository: Arc<dyn InvitationRepository>,
    email_sender: Arc<dyn EmailSender>,
    public_base_url: String,
    ttl_days: i64,
}

impl ShareProjectUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        invitation_repository: Arc<dyn InvitationRepository>,
        email_sender: Arc<dyn EmailSender>,
        public_base_url: String,
        ttl_days: i64,
    ) -> Self {
        Self {
            access_control,
            invitation_repository,
            email_sender,
            public_base_url,
            ttl_days,
        }
    }

    pub async fn execute(
        &self,
        request: ShareProjectRequest,
    ) -> Result<ShareProjectResponse, InvitationFlowError> {
        let project = self
            .access_control
            .require_owner(request.project_id, request.invited_by)
            .await?;

        let message = request
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let invitation = Invitation::new(project.id(), &request.email, request.invited_by, message)
            .map_err(InvitationFlowError::ValidationError)?;
        self.invitation_repository.save(&invitation).await?;

        let invite_url = format!("{}/invitations/{}", self.public_base_url, invitation.token());
        let email = self.compose(&project, &invitation, &invite_url);

        // The invitation stands even if delivery fails; the link can be shared by hand.
        let email_sent = match self.email_sender.send(&email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    invitation_id = %invitation.id(),
                    error = %e,
                    "Invitation email was not delivered"
                );
                false
            }
        };

        tracing::info!(
            project_id = %project.id(),
            invitation_id = %invitation.id(),
            email_sent,
            "Project shared"
        );

        Ok(ShareProjectResponse {
            invitation,
            invite_url,
            email_sent,
        })
    }

    fn compose(&self, project: &Project, invitation: &Invitation, invite_url: &str) -> EmailMessage {
        let mut text = format!(
            "You have been invited to view the wedding footage for \"{}\".\n\n",
            project.name()
        );
        if let Some(message) = invitation.message() {
            text.push_str(message);
            text.push_str("\n\n");
        }
        text.push_str(&format!(
            "Open this link to accept: {}\n\nThe invitation expires in {} days.",
            invite_url, self.ttl_days
        ));

        EmailMessage {
            to: invitation.email().to_string(),
            subject: format!("Your wedding video: {}", project.name()),
            text,
        }
    }
}
