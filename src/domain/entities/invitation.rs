use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::normalize_email;

pub const INVITATION_TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Sent,
    Accepted,
    Declined,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Sent => "sent",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Expired => "expired",
        }
    }
}

impl std::str::FromStr for InvitationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sent" => Ok(InvitationStatus::Sent),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            "expired" => Ok(InvitationStatus::Expired),
            other => Err(format!("Unknown invitation status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationError {
    #[error("Invitation has expired")]
    Expired,
    #[error("Invitation was already {}", .0.as_str())]
    AlreadyResponded(InvitationStatus),
}

/// Grants a couple access to a project once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    id: Uuid,
    project_id: Uuid,
    email: String,
    token: String,
    status: InvitationStatus,
    invited_by: Uuid,
    accepted_by: Option<Uuid>,
    message: Option<String>,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn new(
        project_id: Uuid,
        email: &str,
        invited_by: Uuid,
        message: Option<String>,
    ) -> Result<Self, String> {
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            email: normalize_email(email)?,
            token: generate_token(),
            status: InvitationStatus::Sent,
            invited_by,
            accepted_by: None,
            message,
            created_at: Utc::now(),
            responded_at: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        project_id: Uuid,
        email: String,
        token: String,
        status: InvitationStatus,
        invited_by: Uuid,
        accepted_by: Option<Uuid>,
        message: Option<String>,
        created_at: DateTime<Utc>,
        responded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            project_id,
            email,
            token,
            status,
            invited_by,
            accepted_by,
            message,
            created_at,
            responded_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn status(&self) -> InvitationStatus {
        self.status
    }

    pub fn invited_by(&self) -> Uuid {
        self.invited_by
    }

    pub fn accepted_by(&self) -> Option<Uuid> {
        self.accepted_by
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.created_at + ttl
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.status == InvitationStatus::Expired || now >= self.expires_at(ttl)
    }

    /// Switches an unanswered invitation past its lifetime to `Expired`.
    /// Returns whether the status changed.
    pub fn expire_if_stale(&mut self, now: DateTime<Utc>, ttl: Duration) -> bool {
        if self.status == InvitationStatus::Sent && now >= self.expires_at(ttl) {
            self.status = InvitationStatus::Expired;
            true
        } else {
            false
        }
    }

    pub fn grants_access_to(&self, user_id: Uuid) -> bool {
        self.status == InvitationStatus::Accepted && self.accepted_by == Some(user_id)
    }

    /// Accepts on behalf of `user_id`. An invitation past its lifetime is
    /// switched to `Expired` and rejected, whatever the token says.
    pub fn accept(
        &mut self,
        user_id: Uuid,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(), InvitationError> {
        self.respond(now, ttl)?;
        self.status = InvitationStatus::Accepted;
        self.accepted_by = Some(user_id);
        self.responded_at = Some(now);
        Ok(())
    }

    pub fn decline(&mut self, now: DateTime<Utc>, ttl: Duration) -> Result<(), InvitationError> {
        self.respond(now, ttl)?;
        self.status = InvitationStatus::Declined;
        self.responded_at = Some(now);
        Ok(())
    }

    fn respond(&mut self, now: DateTime<Utc>, ttl: Duration) -> Result<(), InvitationError> {
        match self.status {
            InvitationStatus::Sent if now >= self.expires_at(ttl) => {
                self.status = InvitationStatus::Expired;
                Err(InvitationError::Expired)
            }
            InvitationStatus::Sent => Ok(()),
            InvitationStatus::Expired => Err(InvitationError::Expired),
            other => Err(InvitationError::AlreadyResponded(other)),
        }
    }
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITATION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl() -> Duration {
        Duration::days(30)
    }

    #[test]
    fn test_new_invitation() {
        let invitation =
            Invitation::new(Uuid::new_v4(), "Couple@Example.com", Uuid::new_v4(), None).unwrap();

        assert_eq!(invitation.email(), "couple@example.com");
        assert_eq!(invitation.token().len(), INVITATION_TOKEN_LENGTH);
        assert!(invitation.token().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(invitation.status(), InvitationStatus::Sent);
    }

    #[test]
    fn test_accept_grants_access() {
        let mut invitation =
            Invitation::new(Uuid::new_v4(), "couple@example.com", Uuid::new_v4(), None).unwrap();
        let user_id = Uuid::new_v4();

        invitation.accept(user_id, Utc::now(), ttl()).unwrap();

        assert!(invitation.grants_access_to(user_id));
        assert!(!invitation.grants_access_to(Uuid::new_v4()));
        assert_eq!(
            invitation.decline(Utc::now(), ttl()),
            Err(InvitationError::AlreadyResponded(InvitationStatus::Accepted))
        );
    }

    #[test]
    fn test_accept_after_thirty_days_expires() {
        let mut invitation =
            Invitation::new(Uuid::new_v4(), "couple@example.com", Uuid::new_v4(), None).unwrap();
        let later = invitation.created_at() + Duration::days(31);

        let result = invitation.accept(Uuid::new_v4(), later, ttl());

        assert_eq!(result, Err(InvitationError::Expired));
        assert_eq!(invitation.status(), InvitationStatus::Expired);
        assert!(invitation.accepted_by().is_none());
    }

    #[test]
    fn test_decline() {
        let mut invitation =
            Invitation::new(Uuid::new_v4(), "couple@example.com", Uuid::new_v4(), None).unwrap();
        invitation.decline(Utc::now(), ttl()).unwrap();
        assert_eq!(invitation.status(), InvitationStatus::Declined);
        assert!(invitation.responded_at().is_some());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(InvitationError::Expired.to_string(), "Invitation has expired");
        assert_eq!(
            InvitationError::AlreadyResponded(InvitationStatus::Declined).to_string(),
            "Invitation was already declined"
        );
    }
}
