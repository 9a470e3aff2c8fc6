use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Analytics record of one semantic search. Append only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    id: Uuid,
    project_id: Uuid,
    user_id: Option<Uuid>,
    query_text: String,
    query_embedding: Option<Vector>,
    execution_time_ms: i32,
    results_count: i32,
    created_at: DateTime<Utc>,
}

impl SearchQuery {
    pub fn new(
        project_id: Uuid,
        user_id: Option<Uuid>,
        query_text: String,
        query_embedding: Option<Vector>,
    ) -> Result<Self, String> {
        if query_text.trim().is_empty() {
            return Err("Search query cannot be empty".to_string());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            query_text,
            query_embedding,
            execution_time_ms: 0,
            results_count: 0,
            created_at: Utc::now(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        project_id: Uuid,
        user_id: Option<Uuid>,
        query_text: String,
        query_embedding: Option<Vector>,
        execution_time_ms: i32,
        results_count: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            user_id,
            query_text,
            query_embedding,
            execution_time_ms,
            results_count,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn query_embedding(&self) -> Option<&Vector> {
        self.query_embedding.as_ref()
    }

    pub fn execution_time_ms(&self) -> i32 {
        self.execution_time_ms
    }

    pub fn results_count(&self) -> i32 {
        self.results_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn record_outcome(&mut self, execution_time_ms: u128, results_count: usize) {
        self.execution_time_ms = i32::try_from(execution_time_ms).unwrap_or(i32::MAX);
        self.results_count = i32::try_from(results_count).unwrap_or(i32::MAX);
    }
}

/// One ranked hit of a [`SearchQuery`], with click-through state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    id: Uuid,
    search_query_id: Uuid,
    moment_id: Uuid,
    rank: i32,
    similarity: f32,
    clicked: bool,
    clicked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn new(search_query_id: Uuid, moment_id: Uuid, rank: i32, similarity: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            search_query_id,
            moment_id,
            rank,
            similarity,
            clicked: false,
            clicked_at: None,
            created_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        search_query_id: Uuid,
        moment_id: Uuid,
        rank: i32,
        similarity: f32,
        clicked: bool,
        clicked_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            search_query_id,
            moment_id,
            rank,
            similarity,
            clicked,
            clicked_at,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn search_query_id(&self) -> Uuid {
        self.search_query_id
    }

    pub fn moment_id(&self) -> Uuid {
        self.moment_id
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }

    pub fn similarity(&self) -> f32 {
        self.similarity
    }

    pub fn clicked(&self) -> bool {
        self.clicked
    }

    pub fn clicked_at(&self) -> Option<DateTime<Utc>> {
        self.clicked_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the result clicked. The first click time is kept.
    pub fn mark_clicked(&mut self) {
        if !self.clicked {
            self.clicked = true;
            self.clicked_at = Some(Utc::now());
        }
    }
}
