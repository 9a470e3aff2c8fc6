use serde::{Deserialize, Serialize};

use crate::application::ports::media_analysis::TranscriptionState;
use crate::domain::value_objects::{TimeRange, TranscriptSegment};

/// Optional body of the ingestion calls that need the video length.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestDurationDto {
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionStartedDto {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionResultDto {
    pub status: String,
    pub segments: Vec<TranscriptSegment>,
    pub error: Option<String>,
}

impl From<TranscriptionState> for TranscriptionResultDto {
    fn from(state: TranscriptionState) -> Self {
        match state {
            TranscriptionState::InProgress => Self {
                status: "in_progress".to_string(),
                segments: Vec::new(),
                error: None,
            },
            TranscriptionState::Completed(segments) => Self {
                status: "completed".to_string(),
                segments,
                error: None,
            },
            TranscriptionState::Failed(error) => Self {
                status: "failed".to_string(),
                segments: Vec::new(),
                error: Some(error),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotDto {
    pub start_time: f64,
    pub end_time: f64,
}

impl From<&TimeRange> for ShotDto {
    fn from(range: &TimeRange) -> Self {
        Self {
            start_time: range.start(),
            end_time: range.end(),
        }
    }
}
