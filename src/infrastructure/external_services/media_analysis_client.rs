use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

use crate::application::ports::media_analysis::{
    Analyzed, MediaAnalysisError, MediaAnalysisProvider, TranscriptionState,
};
use crate::config::ServicesConfig;
use crate::domain::value_objects::{DetectedFace, DetectedLabel, TranscriptSegment};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartedJob {
    job_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TranscriptionStatus {
    InProgress,
    Completed,
    Failed,
}

#[derive(Deserialize)]
struct TranscriptionBody {
    status: TranscriptionStatus,
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct LabelsBody {
    #[serde(default)]
    labels: Vec<DetectedLabel>,
}

#[derive(Deserialize)]
struct FacesBody {
    #[serde(default)]
    faces: Vec<DetectedFace>,
}

/// Client for the hosted transcription and vision service.
///
/// Every call returns the decoded value along with the JSON body as received,
/// so callers can keep the raw response for later inspection.
pub struct HttpMediaAnalysisProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpMediaAnalysisProvider {
    pub fn new(base_url: String, api_key: Option<String>, timeout_secs: u64) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// `None` when no analysis service URL is configured.
    pub fn from_config(config: &ServicesConfig) -> Result<Option<Self>, ReqwestError> {
        match &config.analysis_url {
            Some(url) => Ok(Some(Self::new(
                url.clone(),
                config.analysis_api_key.clone(),
                config.timeout_secs,
            )?)),
            None => Ok(None),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Analyzed<T>, MediaAnalysisError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| MediaAnalysisError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| MediaAnalysisError::InvalidResponse(e.to_string()))?;
        let value = serde_json::from_value(raw.clone())
            .map_err(|e| MediaAnalysisError::InvalidResponse(e.to_string()))?;

        Ok(Analyzed { value, raw })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn map_http_error(status: StatusCode, body: String) -> MediaAnalysisError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MediaAnalysisError::ApiError(format!(
            "Authentication failed ({}): {}",
            status, body
        )),
        StatusCode::TOO_MANY_REQUESTS => {
            MediaAnalysisError::ApiError(format!("Rate limit exceeded (429): {}", body))
        }
        _ => MediaAnalysisError::ApiError(format!("Analysis API error ({}): {}", status, body)),
    }
}

#[async_trait]
impl MediaAnalysisProvider for HttpMediaAnalysisProvider {
    async fn start_transcription(
        &self,
        media_url: &str,
    ) -> Result<Analyzed<String>, MediaAnalysisError> {
        let request = self
            .client
            .post(self.url("transcriptions"))
            .json(&json!({ "mediaUrl": media_url }));
        let started: Analyzed<StartedJob> = self.send(request).await?;

        Ok(Analyzed {
            value: started.value.job_id,
            raw: started.raw,
        })
    }

    async fn get_transcription(
        &self,
        job_id: &str,
    ) -> Result<Analyzed<TranscriptionState>, MediaAnalysisError> {
        let request = self.client.get(self.url(&format!("transcriptions/{}", job_id)));
        let body: Analyzed<TranscriptionBody> = self.send(request).await?;

        let state = match body.value.status {
            TranscriptionStatus::InProgress => TranscriptionState::InProgress,
            TranscriptionStatus::Completed => TranscriptionState::Completed(body.value.segments),
            TranscriptionStatus::Failed => TranscriptionState::Failed(
                body.value
                    .error
                    .unwrap_or_else(|| "transcription failed".to_string()),
            ),
        };

        Ok(Analyzed {
            value: state,
            raw: body.raw,
        })
    }

    async fn detect_labels(
        &self,
        media_url: &str,
    ) -> Result<Analyzed<Vec<DetectedLabel>>, MediaAnalysisError> {
        let request = self
            .client
            .post(self.url("labels"))
            .json(&json!({ "mediaUrl": media_url }));
        let body: Analyzed<LabelsBody> = self.send(request).await?;

        Ok(Analyzed {
            value: body.value.labels,
            raw: body.raw,
        })
    }

    async fn detect_faces(
        &self,
        media_url: &str,
    ) -> Result<Analyzed<Vec<DetectedFace>>, MediaAnalysisError> {
        let request = self
            .client
            .post(self.url("faces"))
            .json(&json!({ "mediaUrl": media_url }));
        let body: Analyzed<FacesBody> = self.send(request).await?;

        Ok(Analyzed {
            value: body.value.faces,
            raw: body.raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    async fn provider(server: &MockServer) -> HttpMediaAnalysisProvider {
        HttpMediaAnalysisProvider::new(server.uri(), Some("analysis-key".to_string()), 5).unwrap()
    }

    #[tokio::test]
    async fn test_start_transcription_returns_job_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transcriptions"))
            .and(header("Authorization", "Bearer analysis-key"))
            .and(body_json(json!({ "mediaUrl": "http://media/1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobId": "tx-9" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let started = provider(&mock_server)
            .await
            .start_transcription("http://media/1")
            .await
            .unwrap();
        assert_eq!(started.value, "tx-9");
        assert_eq!(started.raw["jobId"], "tx-9");
    }

    #[tokio::test]
    async fn test_completed_transcription_parses_segments() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transcriptions/tx-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "completed",
                "segments": [
                    { "startTime": 0.0, "endTime": 4.5, "text": "We are gathered here", "confidence": 0.92 },
                    { "startTime": 4.5, "endTime": 9.0, "text": "today", "speaker": "officiant" }
                ]
            })))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).await.get_transcription("tx-9").await.unwrap();
        match result.value {
            TranscriptionState::Completed(segments) => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[1].speaker.as_deref(), Some("officiant"));
                assert_eq!(segments[1].confidence, 1.0);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_and_pending_transcriptions() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transcriptions/pending"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "in_progress" })),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transcriptions/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "failed",
                "error": "audio track missing"
            })))
            .mount(&mock_server)
            .await;

        let client = provider(&mock_server).await;
        let pending = client.get_transcription("pending").await.unwrap();
        assert_eq!(pending.value, TranscriptionState::InProgress);

        let broken = client.get_transcription("broken").await.unwrap();
        assert_eq!(
            broken.value,
            TranscriptionState::Failed("audio track missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_labels_and_faces() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "labels": [{ "name": "Bouquet", "confidence": 88.0, "startTime": 12.0, "endTime": 15.0 }]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/faces"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "faces": [{ "timestamp": 3.0, "confidence": 0.8, "emotions": ["HAPPY"] }]
            })))
            .mount(&mock_server)
            .await;

        let client = provider(&mock_server).await;
        let labels = client.detect_labels("http://media/1").await.unwrap();
        assert_eq!(labels.value[0].name, "Bouquet");
        assert_eq!(labels.value[0].start_time, Some(12.0));

        let faces = client.detect_faces("http://media/1").await.unwrap();
        assert_eq!(faces.value[0].emotions, vec!["HAPPY".to_string()]);
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).await.detect_labels("http://media/1").await;
        match result {
            Err(MediaAnalysisError::ApiError(message)) => {
                assert!(message.contains("401"));
                assert!(message.contains("bad key"));
            }
            other => panic!("unexpected result {:?}", other.map(|a| a.value)),
        }
    }

    #[test]
    fn test_unconfigured_service_yields_none() {
        let config = crate::config::Config::for_tests().services;
        assert!(HttpMediaAnalysisProvider::from_config(&config).unwrap().is_none());
    }
}
