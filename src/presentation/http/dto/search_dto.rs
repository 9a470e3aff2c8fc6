use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::search_service::{SearchHit, SearchOutcome};
use crate::domain::entities::SearchResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestDto {
    pub query: String,
    pub project_id: Uuid,
    pub limit: Option<i64>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHitDto {
    pub result_id: Uuid,
    pub moment_id: Uuid,
    pub file_id: Uuid,
    pub start_time: f64,
    pub end_time: f64,
    pub content_type: String,
    pub description: String,
    pub transcript: Option<String>,
    pub tags: Vec<String>,
    pub similarity: f64,
    pub confidence: f32,
    pub thumbnail_path: Option<String>,
}

impl From<&SearchHit> for SearchHitDto {
    fn from(hit: &SearchHit) -> Self {
        Self {
            result_id: hit.result_id,
            moment_id: hit.moment_id,
            file_id: hit.file_id,
            start_time: hit.start_time_seconds,
            end_time: hit.end_time_seconds,
            content_type: hit.kind.as_str().to_string(),
            description: hit.description.clone(),
            transcript: hit.transcript.clone(),
            tags: hit.tags.clone(),
            similarity: hit.similarity,
            confidence: hit.confidence,
            thumbnail_path: hit.thumbnail_path.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponseDto {
    pub query: String,
    pub results: Vec<SearchHitDto>,
    pub total: usize,
    pub cached: bool,
    pub query_id: Option<Uuid>,
    pub fallback_embedding: bool,
}

impl SearchResponseDto {
    pub fn new(query: String, outcome: SearchOutcome) -> Self {
        let results: Vec<SearchHitDto> = outcome.hits.iter().map(SearchHitDto::from).collect();
        Self {
            query,
            total: results.len(),
            results,
            cached: outcome.cached,
            query_id: outcome.query_id,
            fallback_embedding: outcome.fallback_embedding,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchClickDto {
    pub result_id: Uuid,
    pub moment_id: Uuid,
    pub clicked: bool,
    pub clicked_at: Option<String>,
}

impl From<&SearchResult> for SearchClickDto {
    fn from(result: &SearchResult) -> Self {
        Self {
            result_id: result.id(),
            moment_id: result.moment_id(),
            clicked: result.clicked(),
            clicked_at: result.clicked_at().map(|dt| dt.to_rfc3339()),
        }
    }
}
