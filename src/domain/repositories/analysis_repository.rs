use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AiAnalysis, AnalysisType};
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn save(&self, analysis: &AiAnalysis) -> Result<(), RepositoryError>;
    async fn find_latest(
        &self,
        file_id: Uuid,
        analysis_type: AnalysisType,
    ) -> Result<Option<AiAnalysis>, RepositoryError>;
}
