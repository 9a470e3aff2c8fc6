use async_trait::async_trait;
use serde_json::Value;

use crate::domain::value_objects::{DetectedFace, DetectedLabel, TranscriptSegment};

#[derive(Debug, thiserror::Error)]
pub enum MediaAnalysisError {
    #[error("Media analysis service is not configured")]
    NotConfigured,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// A value decoded from an analysis response, together with the response body
/// as it was received.
#[derive(Debug, Clone)]
pub struct Analyzed<T> {
    pub value: T,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionState {
    InProgress,
    Completed(Vec<TranscriptSegment>),
    Failed(String),
}

/// Hosted transcription and vision services.
#[async_trait]
pub trait MediaAnalysisProvider: Send + Sync {
    /// Starts an asynchronous transcription and returns the provider's job id.
    async fn start_transcription(&self, media_url: &str)
    -> Result<Analyzed<String>, MediaAnalysisError>;

    async fn get_transcription(
        &self,
        job_id: &str,
    ) -> Result<Analyzed<TranscriptionState>, MediaAnalysisError>;

    async fn detect_labels(
        &self,
        media_url: &str,
    ) -> Result<Analyzed<Vec<DetectedLabel>>, MediaAnalysisError>;

    async fn detect_faces(
        &self,
        media_url: &str,
    ) -> Result<Analyzed<Vec<DetectedFace>>, MediaAnalysisError>;
}
