use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::list_moments::MomentPage;
use crate::domain::entities::VideoMoment;

use super::PaginationMetaDto;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentDto {
    pub id: Uuid,
    pub file_id: Uuid,
    pub project_id: Uuid,
    pub start_time_seconds: f64,
    pub end_time_seconds: f64,
    pub duration_seconds: f64,
    pub content_type: String,
    pub description: String,
    pub transcript: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f32,
    pub quality_score: f32,
    pub speaker: Option<String>,
    pub thumbnail_path: Option<String>,
    pub created_at: String,
}

impl From<&VideoMoment> for MomentDto {
    fn from(moment: &VideoMoment) -> Self {
        Self {
            id: moment.id(),
            file_id: moment.file_id(),
            project_id: moment.project_id(),
            start_time_seconds: moment.start_time_seconds(),
            end_time_seconds: moment.end_time_seconds(),
            duration_seconds: moment.duration(),
            content_type: moment.kind().as_str().to_string(),
            description: moment.description().to_string(),
            transcript: moment.transcript().map(str::to_string),
            tags: moment.tags().to_vec(),
            confidence: moment.confidence(),
            quality_score: moment.quality_score(),
            speaker: moment.speaker().map(str::to_string),
            thumbnail_path: moment.thumbnail_path().map(str::to_string),
            created_at: moment.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentQueryDto {
    pub content_type: Option<String>,
    pub file_id: Option<Uuid>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct MomentListResponseDto {
    pub moments: Vec<MomentDto>,
    pub meta: PaginationMetaDto,
}

impl From<MomentPage> for MomentListResponseDto {
    fn from(page: MomentPage) -> Self {
        Self {
            moments: page.moments.iter().map(MomentDto::from).collect(),
            meta: PaginationMetaDto {
                offset: page.offset,
                limit: page.limit,
                total: page.total,
            },
        }
    }
}
