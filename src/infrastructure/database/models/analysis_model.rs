use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{AiAnalysis, AnalysisType};
use crate::infrastructure::database::schema::ai_analysis;

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ai_analysis)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AnalysisModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub analysis_type: String,
    pub raw_result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&AiAnalysis> for AnalysisModel {
    fn from(analysis: &AiAnalysis) -> Self {
        Self {
            id: analysis.id(),
            file_id: analysis.file_id(),
            analysis_type: analysis.analysis_type().as_str().to_string(),
            raw_result: analysis.raw_result().clone(),
            created_at: analysis.created_at(),
        }
    }
}

impl TryFrom<AnalysisModel> for AiAnalysis {
    type Error = String;

    fn try_from(model: AnalysisModel) -> Result<Self, Self::Error> {
        let analysis_type: AnalysisType = model.analysis_type.parse()?;
        Ok(AiAnalysis::from_database(
            model.id,
            model.file_id,
            analysis_type,
            model.raw_result,
            model.created_at,
        ))
    }
}
