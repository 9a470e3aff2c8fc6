use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{InvitationStatus, Project};
use crate::domain::repositories::{ProjectRepository, RepositoryError};
use crate::infrastructure::database::models::{NewProjectModel, ProjectModel};
use crate::infrastructure::database::schema::{project_invitations, projects};
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresProjectRepository {
    pool: DbPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: ProjectModel) -> Result<Project, RepositoryError> {
    Project::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn save(&self, project: &Project) -> Result<(), RepositoryError> {
        let new_project = NewProjectModel::from(project);

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(projects::table)
                .values(&new_project)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, project_id: Uuid) -> Result<Option<Project>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            projects::table
                .find(project_id)
                .select(ProjectModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_accessible(&self, user_id: Uuid) -> Result<Vec<Project>, RepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            let shared_with_user = project_invitations::table
                .filter(project_invitations::accepted_by.eq(user_id))
                .filter(project_invitations::status.eq(InvitationStatus::Accepted.as_str()))
                .select(project_invitations::project_id);

            projects::table
                .filter(
                    projects::owner_id
                        .eq(user_id)
                        .or(projects::id.eq_any(shared_with_user)),
                )
                .order(projects::created_at.desc())
                .select(ProjectModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update(&self, project: &Project) -> Result<(), RepositoryError> {
        let changes = NewProjectModel::from(project);
        let project_id = project.id();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(projects::table.find(project_id))
                .set(&changes)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(project_id));
        }
        Ok(())
    }

    async fn delete(&self, project_id: Uuid) -> Result<bool, RepositoryError> {
        let deleted = run_blocking(&self.pool, move |conn| {
            diesel::delete(projects::table.find(project_id))
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(deleted > 0)
    }
}
