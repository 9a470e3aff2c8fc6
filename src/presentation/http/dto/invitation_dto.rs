use serde::Serialize;
use uuid::Uuid;

use crate::application::use_cases::respond_to_invitation::InvitationDetails;

use super::ProjectDto;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDto {
    pub id: Uuid,
    pub email: String,
    pub status: String,
    pub message: Option<String>,
    pub invited_by: Uuid,
    pub accepted_by: Option<Uuid>,
    pub created_at: String,
    pub responded_at: Option<String>,
    pub expires_at: String,
    pub project: ProjectDto,
}

impl From<InvitationDetails> for InvitationDto {
    fn from(details: InvitationDetails) -> Self {
        let invitation = &details.invitation;
        Self {
            id: invitation.id(),
            email: invitation.email().to_string(),
            status: invitation.status().as_str().to_string(),
            message: invitation.message().map(str::to_string),
            invited_by: invitation.invited_by(),
            accepted_by: invitation.accepted_by(),
            created_at: invitation.created_at().to_rfc3339(),
            responded_at: invitation.responded_at().map(|dt| dt.to_rfc3339()),
            expires_at: details.expires_at.to_rfc3339(),
            project: ProjectDto::from(&details.project),
        }
    }
}
