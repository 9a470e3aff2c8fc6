use std::sync::Arc;

use pgvector::Vector;
use rand::Rng;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::config::{EmbeddingsConfig, FallbackPolicy};

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingServiceError {
    #[error("Embedding provider error: {0}")]
    ProviderError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Where a generated vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingSource {
    Primary,
    Secondary,
    /// Random substitute produced after every provider failed.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct GeneratedEmbedding {
    pub vector: Vector,
    pub source: EmbeddingSource,
}

impl GeneratedEmbedding {
    pub fn is_fallback(&self) -> bool {
        self.source == EmbeddingSource::Fallback
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub dimension: usize,
    pub max_chars: usize,
    pub fallback: FallbackPolicy,
}

impl From<&EmbeddingsConfig> for EmbeddingSettings {
    fn from(config: &EmbeddingsConfig) -> Self {
        Self {
            dimension: config.dimension,
            max_chars: config.max_chars,
            fallback: config.fallback,
        }
    }
}

/// Turns text into vectors of a fixed dimension.
///
/// Input is cut to `max_chars` characters. The primary provider is tried
/// first, then the secondary one. When both fail the configured fallback
/// policy decides between a random vector and an error.
pub struct EmbeddingService {
    primary: Option<Arc<dyn EmbeddingProvider>>,
    secondary: Option<Arc<dyn EmbeddingProvider>>,
    settings: EmbeddingSettings,
}

impl EmbeddingService {
    pub fn new(
        primary: Option<Arc<dyn EmbeddingProvider>>,
        secondary: Option<Arc<dyn EmbeddingProvider>>,
        settings: EmbeddingSettings,
    ) -> Self {
        Self {
            primary,
            secondary,
            settings,
        }
    }

    pub fn dimension(&self) -> usize {
        self.settings.dimension
    }

    pub async fn generate(&self, text: &str) -> Result<GeneratedEmbedding, EmbeddingServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbeddingServiceError::ValidationError(
                "Cannot generate embedding for empty text".to_string(),
            ));
        }
        let text = truncate_chars(text, self.settings.max_chars);

        let mut last_error = None;
        for (provider, source) in [
            (&self.primary, EmbeddingSource::Primary),
            (&self.secondary, EmbeddingSource::Secondary),
        ] {
            let Some(provider) = provider else {
                continue;
            };
            match self.try_provider(provider.as_ref(), text).await {
                Ok(vector) => return Ok(GeneratedEmbedding { vector, source }),
                Err(e) => {
                    tracing::warn!(
                        provider = %provider.model_info(),
                        error = %e,
                        "Embedding provider failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no embedding provider configured".to_string());

        match self.settings.fallback {
            FallbackPolicy::Error => Err(EmbeddingServiceError::ProviderError(reason)),
            FallbackPolicy::Random => {
                tracing::warn!(
                    reason = %reason,
                    dimension = self.settings.dimension,
                    "Substituting a random embedding; similarity scores for this text are meaningless"
                );
                Ok(GeneratedEmbedding {
                    vector: random_vector(self.settings.dimension),
                    source: EmbeddingSource::Fallback,
                })
            }
        }
    }

    async fn try_provider(
        &self,
        provider: &dyn EmbeddingProvider,
        text: &str,
    ) -> Result<Vector, EmbeddingProviderError> {
        let response = provider.generate_embedding(text).await?;
        let actual = response.embedding.as_slice().len();
        if actual != self.settings.dimension {
            return Err(EmbeddingProviderError::ApiError(format!(
                "model {} returned {} dimensions, expected {}",
                response.model_name, actual, self.settings.dimension
            )));
        }
        Ok(response.embedding)
    }
}

fn random_vector(dimension: usize) -> Vector {
    let mut rng = rand::thread_rng();
    let values: Vec<f32> = (0..dimension).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Vector::from(values)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
