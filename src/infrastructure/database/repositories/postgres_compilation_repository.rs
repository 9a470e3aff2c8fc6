use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{Compilation, CompilationMoment};
use crate::domain::repositories::{CompilationRepository, RepositoryError};
use crate::infrastructure::database::models::{CompilationModel, CompilationMomentModel};
use crate::infrastructure::database::schema::{compilation_moments, video_compilations};
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresCompilationRepository {
    pool: DbPool,
}

impl PostgresCompilationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: CompilationModel) -> Result<Compilation, RepositoryError> {
    Compilation::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl CompilationRepository for PostgresCompilationRepository {
    async fn save(
        &self,
        compilation: &Compilation,
        moments: &[CompilationMoment],
    ) -> Result<(), RepositoryError> {
        let model = CompilationModel::from(compilation);
        let entries: Vec<CompilationMomentModel> =
            moments.iter().map(CompilationMomentModel::from).collect();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<(), diesel::result::Error, _>(|conn| {
                diesel::insert_into(video_compilations::table)
                    .values(&model)
                    .execute(conn)?;
                if !entries.is_empty() {
                    diesel::insert_into(compilation_moments::table)
                        .values(&entries)
                        .execute(conn)?;
                }
                Ok(())
            })
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_by_id(&self, compilation_id: Uuid) -> Result<Option<Compilation>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            video_compilations::table
                .find(compilation_id)
                .select(CompilationModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Compilation>, RepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            video_compilations::table
                .filter(video_compilations::project_id.eq(project_id))
                .order(video_compilations::created_at.desc())
                .select(CompilationModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn find_moments(
        &self,
        compilation_id: Uuid,
    ) -> Result<Vec<CompilationMoment>, RepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            compilation_moments::table
                .filter(compilation_moments::compilation_id.eq(compilation_id))
                .order(compilation_moments::position.asc())
                .select(CompilationMomentModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models
            .into_iter()
            .map(|m| CompilationMoment::try_from(m).map_err(RepositoryError::ValidationError))
            .collect()
    }

    async fn update(&self, compilation: &Compilation) -> Result<(), RepositoryError> {
        let model = CompilationModel::from(compilation);
        let compilation_id = compilation.id();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(video_compilations::table.find(compilation_id))
                .set(&model)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(compilation_id));
        }
        Ok(())
    }
}
