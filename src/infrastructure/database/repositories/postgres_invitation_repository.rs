use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{Invitation, InvitationStatus};
use crate::domain::repositories::{InvitationRepository, RepositoryError};
use crate::infrastructure::database::models::InvitationModel;
use crate::infrastructure::database::schema::project_invitations;
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresInvitationRepository {
    pool: DbPool,
}

impl PostgresInvitationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: InvitationModel) -> Result<Invitation, RepositoryError> {
    Invitation::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    async fn save(&self, invitation: &Invitation) -> Result<(), RepositoryError> {
        let model = InvitationModel::from(invitation);

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(project_invitations::table)
                .values(&model)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, RepositoryError> {
        let token = token.to_string();
        let model = run_blocking(&self.pool, move |conn| {
            project_invitations::table
                .filter(project_invitations::token.eq(token))
                .select(InvitationModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Invitation>, RepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            project_invitations::table
                .filter(project_invitations::project_id.eq(project_id))
                .order(project_invitations::created_at.desc())
                .select(InvitationModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update(&self, invitation: &Invitation) -> Result<(), RepositoryError> {
        let model = InvitationModel::from(invitation);
        let invitation_id = invitation.id();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(project_invitations::table.find(invitation_id))
                .set(&model)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(invitation_id));
        }
        Ok(())
    }

    async fn has_accepted(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            diesel::select(diesel::dsl::exists(
                project_invitations::table
                    .filter(project_invitations::project_id.eq(project_id))
                    .filter(project_invitations::accepted_by.eq(user_id))
                    .filter(project_invitations::status.eq(InvitationStatus::Accepted.as_str())),
            ))
            .get_result(conn)
            .map_err(map_diesel_error)
        })
        .await
    }
}
