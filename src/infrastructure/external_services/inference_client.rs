use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, EmbeddingResponse,
};
use crate::config::{EmbeddingApiFormat, EmbeddingsConfig};

#[derive(Serialize)]
struct InferenceRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct InferenceResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub api_format: EmbeddingApiFormat,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
    /// Delay before the first retry; later retries scale it by `backoff_factor`.
    pub retry_base_delay: Duration,
}

impl EmbeddingsClientConfig {
    pub fn primary(config: &EmbeddingsConfig) -> Option<Self> {
        let service_url = config.service_url.clone()?;
        Some(Self {
            service_url,
            api_format: config.api_format,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
            max_retries: config.max_retries,
            timeout_secs: config.timeout_secs,
            backoff_factor: config.backoff_factor,
            retry_base_delay: Duration::from_secs(1),
        })
    }

    pub fn secondary(config: &EmbeddingsConfig) -> Option<Self> {
        let service_url = config.secondary_url.clone()?;
        Some(Self {
            service_url,
            api_format: config.secondary_api_format,
            api_key: config.secondary_api_key.clone(),
            model: config.secondary_model.clone(),
            dimension: config.dimension,
            max_retries: config.max_retries,
            timeout_secs: config.timeout_secs,
            backoff_factor: config.backoff_factor,
            retry_base_delay: Duration::from_secs(1),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingsError {
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct EmbeddedText {
    pub vector: Vec<f32>,
    pub model: String,
}

/// HTTP client for a hosted embedding endpoint in either wire format.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EmbeddingsClientConfig {
        &self.config
    }

    pub async fn get_embedding(&self, text: &str) -> Result<EmbeddedText, EmbeddingsError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(text).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts > self.config.max_retries {
                        return Err(e);
                    }

                    let backoff_time = self
                        .config
                        .retry_base_delay
                        .mul_f64(self.config.backoff_factor.powi(attempts as i32 - 1));

                    tracing::debug!(
                        url = %self.config.service_url,
                        attempt = attempts,
                        error = %e,
                        backoff_ms = backoff_time.as_millis() as u64,
                        "Retrying embedding request"
                    );
                    tokio::time::sleep(backoff_time).await;
                }
            }
        }
    }

    async fn execute_request(&self, text: &str) -> Result<EmbeddedText, EmbeddingsError> {
        let mut request = self.client.post(&self.config.service_url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        request = match self.config.api_format {
            EmbeddingApiFormat::Inference => request.json(&InferenceRequest { text }),
            EmbeddingApiFormat::OpenAi => request.json(&OpenAiRequest {
                model: &self.config.model,
                input: text,
            }),
        };

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => EmbeddingsError::RateLimited(body),
                _ => EmbeddingsError::Status { status, body },
            });
        }

        match self.config.api_format {
            EmbeddingApiFormat::Inference => {
                let parsed = response
                    .json::<InferenceResponse>()
                    .await
                    .map_err(|e| EmbeddingsError::ParseError(e.to_string()))?;
                let vector = parsed.embeddings.into_iter().next().ok_or_else(|| {
                    EmbeddingsError::ParseError("No embeddings returned".to_string())
                })?;
                Ok(EmbeddedText {
                    vector,
                    model: self.config.model.clone(),
                })
            }
            EmbeddingApiFormat::OpenAi => {
                let parsed = response
                    .json::<OpenAiResponse>()
                    .await
                    .map_err(|e| EmbeddingsError::ParseError(e.to_string()))?;
                let model = parsed.model.unwrap_or_else(|| self.config.model.clone());
                let vector = parsed
                    .data
                    .into_iter()
                    .next()
                    .map(|d| d.embedding)
                    .ok_or_else(|| EmbeddingsError::ParseError("No embeddings returned".to_string()))?;
                Ok(EmbeddedText { vector, model })
            }
        }
    }
}

// Adapter to implement the EmbeddingProvider trait
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        Ok(Self::new(InferenceClient::new(config)?))
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn generate_embedding(
        &self,
        text: &str,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        let response = self.client.get_embedding(text).await.map_err(|e| match e {
            EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
            EmbeddingsError::RateLimited(_) => EmbeddingProviderError::RateLimitExceeded,
            EmbeddingsError::Status { status, .. } if status.is_server_error() => {
                EmbeddingProviderError::ServiceUnavailable
            }
            EmbeddingsError::Status { status, body } => {
                EmbeddingProviderError::ApiError(format!("HTTP {}: {}", status, body))
            }
        })?;

        Ok(EmbeddingResponse {
            embedding: Vector::from(response.vector),
            model_name: response.model,
        })
    }

    fn model_info(&self) -> String {
        let config = self.client.config();
        format!("{} @ {}", config.model, config.service_url)
    }

    fn embedding_dimension(&self) -> usize {
        self.client.config().dimension
    }
}
