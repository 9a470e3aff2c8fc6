use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{SearchQuery, SearchResult};
use crate::infrastructure::database::models::{vector_from_json, vector_to_json};
use crate::infrastructure::database::schema::{search_queries, search_results};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = search_queries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SearchQueryModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub query_text: String,
    pub query_embedding: Option<serde_json::Value>,
    pub execution_time_ms: i32,
    pub results_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = search_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SearchResultModel {
    pub id: Uuid,
    pub search_query_id: Uuid,
    pub moment_id: Uuid,
    pub rank: i32,
    pub similarity: f32,
    pub clicked: bool,
    pub clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&SearchQuery> for SearchQueryModel {
    fn from(query: &SearchQuery) -> Self {
        Self {
            id: query.id(),
            project_id: query.project_id(),
            user_id: query.user_id(),
            query_text: query.query_text().to_string(),
            query_embedding: query.query_embedding().map(vector_to_json),
            execution_time_ms: query.execution_time_ms(),
            results_count: query.results_count(),
            created_at: query.created_at(),
        }
    }
}

impl TryFrom<SearchQueryModel> for SearchQuery {
    type Error = String;

    fn try_from(model: SearchQueryModel) -> Result<Self, Self::Error> {
        let embedding = model.query_embedding.map(vector_from_json).transpose()?;
        Ok(SearchQuery::from_database(
            model.id,
            model.project_id,
            model.user_id,
            model.query_text,
            embedding,
            model.execution_time_ms,
            model.results_count,
            model.created_at,
        ))
    }
}

impl From<&SearchResult> for SearchResultModel {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id(),
            search_query_id: result.search_query_id(),
            moment_id: result.moment_id(),
            rank: result.rank(),
            similarity: result.similarity(),
            clicked: result.clicked(),
            clicked_at: result.clicked_at(),
            created_at: result.created_at(),
        }
    }
}

impl From<SearchResultModel> for SearchResult {
    fn from(model: SearchResultModel) -> Self {
        SearchResult::from_database(
            model.id,
            model.search_query_id,
            model.moment_id,
            model.rank,
            model.similarity,
            model.clicked,
            model.clicked_at,
            model.created_at,
        )
    }
}
