use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::media_transcoder::{
    ClipSpec, MediaTranscoder, TranscodeState, TranscoderError,
};
use crate::config::ServicesConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    name: &'a str,
    clips: &'a [ClipSpec],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    job_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: String,
    #[serde(default)]
    output_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Managed media-conversion service that renders compilations.
pub struct HttpMediaTranscoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpMediaTranscoder {
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

    pub fn from_config(config: &ServicesConfig) -> Result<Option<Self>, ReqwestError> {
        match &config.transcoder_url {
            Some(url) => Ok(Some(Self::new(
                url.clone(),
                config.transcoder_api_key.clone(),
                config.timeout_secs,
            )?)),
            None => Ok(None),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TranscoderError> {
        let request = match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| TranscoderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscoderError::ApiError(format!(
                "Transcoder API error ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranscoderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MediaTranscoder for HttpMediaTranscoder {
    async fn submit(&self, name: &str, clips: &[ClipSpec]) -> Result<String, TranscoderError> {
        let request = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .json(&SubmitRequest { name, clips });
        let response: SubmitResponse = self.send(request).await?;
        Ok(response.job_id)
    }

    async fn status(&self, job_id: &str) -> Result<TranscodeState, TranscoderError> {
        let request = self.client.get(format!("{}/jobs/{}", self.base_url, job_id));
        let response: StatusResponse = self.send(request).await?;

        match response.status.to_ascii_lowercase().as_str() {
            "completed" | "complete" => match response.output_url {
                Some(output_url) => Ok(TranscodeState::Completed { output_url }),
                None => Err(TranscoderError::InvalidResponse(
                    "completed job has no outputUrl".to_string(),
                )),
            },
            "failed" | "error" => Ok(TranscodeState::Failed(
                response
                    .error
                    .unwrap_or_else(|| "transcoding failed".to_string()),
            )),
            _ => Ok(TranscodeState::InProgress),
        }
    }
}
