use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{AiAnalysis, AnalysisType};
use crate::domain::repositories::{AnalysisRepository, RepositoryError};
use crate::infrastructure::database::models::AnalysisModel;
use crate::infrastructure::database::schema::ai_analysis;
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresAnalysisRepository {
    pool: DbPool,
}

impl PostgresAnalysisRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisRepository for PostgresAnalysisRepository {
    async fn save(&self, analysis: &AiAnalysis) -> Result<(), RepositoryError> {
        let model = AnalysisModel::from(analysis);

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(ai_analysis::table)
                .values(&model)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(())
    }

    async fn find_latest(
        &self,
        file_id: Uuid,
        analysis_type: AnalysisType,
    ) -> Result<Option<AiAnalysis>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            ai_analysis::table
                .filter(ai_analysis::file_id.eq(file_id))
                .filter(ai_analysis::analysis_type.eq(analysis_type.as_str()))
                .order(ai_analysis::created_at.desc())
                .select(AnalysisModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model
            .map(|m| AiAnalysis::try_from(m).map_err(RepositoryError::ValidationError))
            .transpose()
    }
}
