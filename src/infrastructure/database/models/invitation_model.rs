use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{Invitation, InvitationStatus};
use crate::infrastructure::database::schema::project_invitations;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = project_invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct InvitationModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub email: String,
    pub token: String,
    pub status: String,
    pub invited_by: Uuid,
    pub accepted_by: Option<Uuid>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<&Invitation> for InvitationModel {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id(),
            project_id: invitation.project_id(),
            email: invitation.email().to_string(),
            token: invitation.token().to_string(),
            status: invitation.status().as_str().to_string(),
            invited_by: invitation.invited_by(),
            accepted_by: invitation.accepted_by(),
            message: invitation.message().map(str::to_string),
            created_at: invitation.created_at(),
            responded_at: invitation.responded_at(),
        }
    }
}

impl TryFrom<InvitationModel> for Invitation {
    type Error = String;

    fn try_from(model: InvitationModel) -> Result<Self, Self::Error> {
        let status: InvitationStatus = model.status.parse()?;
        Ok(Invitation::from_database(
            model.id,
            model.project_id,
            model.email,
            model.token,
            status,
            model.invited_by,
            model.accepted_by,
            model.message,
            model.created_at,
            model.responded_at,
        ))
    }
}
