use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum TranscoderError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// One input clip of a compilation, in playback order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSpec {
    pub source_url: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub transition: String,
    pub transition_duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeState {
    InProgress,
    Completed { output_url: String },
    Failed(String),
}

#[async_trait]
pub trait MediaTranscoder: Send + Sync {
    async fn submit(&self, name: &str, clips: &[ClipSpec]) -> Result<String, TranscoderError>;

    async fn status(&self, job_id: &str) -> Result<TranscodeState, TranscoderError>;
}
