use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Double, Uuid as SqlUuid};
use uuid::Uuid;

use crate::domain::entities::VideoMoment;
use crate::domain::value_objects::{MomentKind, TimeRange};
use crate::infrastructure::database::models::{vector_from_json, vector_to_json};
use crate::infrastructure::database::schema::video_moments;

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Identifiable)]
#[diesel(table_name = video_moments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MomentModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub project_id: Uuid,
    pub start_time_seconds: f64,
    pub end_time_seconds: f64,
    pub content_type: String,
    pub description: String,
    pub transcript: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f32,
    pub quality_score: f32,
    pub embedding: Option<serde_json::Value>,
    pub face_data: Option<serde_json::Value>,
    pub visual_data: Option<serde_json::Value>,
    pub speaker: Option<String>,
    pub thumbnail_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = video_moments)]
pub struct NewMomentModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub project_id: Uuid,
    pub start_time_seconds: f64,
    pub end_time_seconds: f64,
    pub content_type: String,
    pub description: String,
    pub transcript: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f32,
    pub quality_score: f32,
    pub embedding: Option<serde_json::Value>,
    pub face_data: Option<serde_json::Value>,
    pub visual_data: Option<serde_json::Value>,
    pub speaker: Option<String>,
    pub thumbnail_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `search_video_moments` database function.
#[derive(Debug, QueryableByName)]
pub struct MomentMatchRow {
    #[diesel(sql_type = SqlUuid)]
    pub moment_id: Uuid,
    #[diesel(sql_type = Double)]
    pub similarity: f64,
}

impl From<&VideoMoment> for NewMomentModel {
    fn from(moment: &VideoMoment) -> Self {
        Self {
            id: moment.id(),
            file_id: moment.file_id(),
            project_id: moment.project_id(),
            start_time_seconds: moment.start_time_seconds(),
            end_time_seconds: moment.end_time_seconds(),
            content_type: moment.kind().as_str().to_string(),
            description: moment.description().to_string(),
            transcript: moment.transcript().map(str::to_string),
            tags: moment.tags().to_vec(),
            confidence: moment.confidence(),
            quality_score: moment.quality_score(),
            embedding: moment.embedding().map(vector_to_json),
            face_data: moment.face_data().cloned(),
            visual_data: moment.visual_data().cloned(),
            speaker: moment.speaker().map(str::to_string),
            thumbnail_path: moment.thumbnail_path().map(str::to_string),
            created_at: moment.created_at(),
        }
    }
}

impl TryFrom<MomentModel> for VideoMoment {
    type Error = String;

    fn try_from(model: MomentModel) -> Result<Self, Self::Error> {
        let range = TimeRange::new(model.start_time_seconds, model.end_time_seconds)?;
        let kind: MomentKind = model.content_type.parse()?;
        let embedding = model.embedding.map(vector_from_json).transpose()?;

        Ok(VideoMoment::from_database(
            model.id,
            model.file_id,
            model.project_id,
            range,
            kind,
            model.description,
            model.transcript,
            model.tags,
            model.confidence,
            model.quality_score,
            embedding,
            model.face_data,
            model.visual_data,
            model.speaker,
            model.thumbnail_path,
            model.created_at,
        ))
    }
}
