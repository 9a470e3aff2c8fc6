use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::application::ports::search_cache::{SearchCache, SearchCacheKey};
use crate::application::services::embedding_service::{EmbeddingService, EmbeddingServiceError};
use crate::config::SearchConfig;
use crate::domain::entities::{SearchQuery, SearchResult};
use crate::domain::repositories::{MomentRepository, RepositoryError, SearchRepository};
use crate::domain::value_objects::MomentKind;

#[derive(Debug, thiserror::Error)]
pub enum SearchServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Embedding(#[from] EmbeddingServiceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A formatted search result, ready to be cached and returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Analytics row for click tracking.
    pub result_id: Uuid,
    pub moment_id: Uuid,
    pub file_id: Uuid,
    pub start_time_seconds: f64,
    pub end_time_seconds: f64,
    pub kind: MomentKind,
    pub description: String,
    pub transcript: Option<String>,
    pub tags: Vec<String>,
    pub similarity: f64,
    pub confidence: f32,
    pub thumbnail_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub cached: bool,
    pub query_id: Option<Uuid>,
    pub fallback_embedding: bool,
}

pub struct SearchService {
    embedding_service: Arc<EmbeddingService>,
    moment_repository: Arc<dyn MomentRepository>,
    search_repository: Arc<dyn SearchRepository>,
    cache: Arc<dyn SearchCache>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        embedding_service: Arc<EmbeddingService>,
        moment_repository: Arc<dyn MomentRepository>,
        search_repository: Arc<dyn SearchRepository>,
        cache: Arc<dyn SearchCache>,
        config: SearchConfig,
    ) -> Self {
        Self {
            embedding_service,
            moment_repository,
            search_repository,
            cache,
            config,
        }
    }

    /// Clamps caller-supplied paging and threshold values to the configured bounds.
    pub fn resolve_limits(&self, limit: Option<i64>, threshold: Option<f64>) -> (i64, f64) {
        let limit = limit
            .unwrap_or(self.config.default_limit)
            .clamp(1, self.config.max_limit);
        let threshold = threshold
            .filter(|t| t.is_finite())
            .unwrap_or(self.config.default_threshold)
            .clamp(-1.0, 1.0);
        (limit, threshold)
    }

    pub async fn search(
        &self,
        project_id: Uuid,
        user_id: Option<Uuid>,
        query: &str,
        limit: Option<i64>,
        threshold: Option<f64>,
    ) -> Result<SearchOutcome, SearchServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchServiceError::ValidationError(
                "Search query cannot be empty".to_string(),
            ));
        }
        let (limit, threshold) = self.resolve_limits(limit, threshold);

        let key = SearchCacheKey::new(project_id, query, limit, threshold);
        if let Some(hits) = self.cache.get(&key) {
            tracing::debug!(%project_id, query, "Search cache hit");
            return Ok(SearchOutcome {
                hits,
                cached: true,
                query_id: None,
                fallback_embedding: false,
            });
        }

        let started = Instant::now();
        let embedding = self.embedding_service.generate(query).await?;

        let scored = self
            .moment_repository
            .search_similar(project_id, &embedding.vector, threshold, limit)
            .await?;

        let mut search_query =
            SearchQuery::new(project_id, user_id, query.to_string(), Some(embedding.vector.clone()))
                .map_err(SearchServiceError::ValidationError)?;

        let results: Vec<SearchResult> = scored
            .iter()
            .enumerate()
            .map(|(index, scored)| {
                SearchResult::new(
                    search_query.id(),
                    scored.moment.id(),
                    index as i32 + 1,
                    scored.similarity as f32,
                )
            })
            .collect();

        let hits: Vec<SearchHit> = scored
            .into_iter()
            .zip(results.iter())
            .map(|(scored, result)| {
                let moment = scored.moment;
                SearchHit {
                    result_id: result.id(),
                    moment_id: moment.id(),
                    file_id: moment.file_id(),
                    start_time_seconds: moment.start_time_seconds(),
                    end_time_seconds: moment.end_time_seconds(),
                    kind: moment.kind(),
                    description: moment.description().to_string(),
                    transcript: moment.transcript().map(str::to_string),
                    tags: moment.tags().to_vec(),
                    similarity: scored.similarity,
                    confidence: moment.confidence(),
                    thumbnail_path: moment.thumbnail_path().map(str::to_string),
                }
            })
            .collect();

        search_query.record_outcome(started.elapsed().as_millis(), hits.len());
        self.search_repository.record(&search_query, &results).await?;

        tracing::info!(
            %project_id,
            results = hits.len(),
            elapsed_ms = search_query.execution_time_ms(),
            fallback_embedding = embedding.is_fallback(),
            "Semantic search completed"
        );

        // Random-vector results are not worth serving again.
        if !embedding.is_fallback() {
            self.cache.insert(key, hits.clone());
        }

        Ok(SearchOutcome {
            hits,
            cached: false,
            query_id: Some(search_query.id()),
            fallback_embedding: embedding.is_fallback(),
        })
    }

    pub fn invalidate_project(&self, project_id: Uuid) {
        self.cache.invalidate_project(project_id);
    }
}
