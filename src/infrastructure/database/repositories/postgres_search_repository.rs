use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{SearchQuery, SearchResult};
use crate::domain::repositories::{RepositoryError, SearchRepository};
use crate::infrastructure::database::models::{SearchQueryModel, SearchResultModel};
use crate::infrastructure::database::schema::{search_queries, search_results};
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresSearchRepository {
    pool: DbPool,
}

impl PostgresSearchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchRepository for PostgresSearchRepository {
    async fn record(
        &self,
        query: &SearchQuery,
        results: &[SearchResult],
    ) -> Result<(), RepositoryError> {
        let query_model = SearchQueryModel::from(query);
        let result_models: Vec<SearchResultModel> =
            results.iter().map(SearchResultModel::from).collect();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<(), diesel::result::Error, _>(|conn| {
                diesel::insert_into(search_queries::table)
                    .values(&query_model)
                    .execute(conn)?;
                if !result_models.is_empty() {
                    diesel::insert_into(search_results::table)
                        .values(&result_models)
                        .execute(conn)?;
                }
                Ok(())
            })
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_query(&self, query_id: Uuid) -> Result<Option<SearchQuery>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            search_queries::table
                .find(query_id)
                .select(SearchQueryModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model
            .map(|m| SearchQuery::try_from(m).map_err(RepositoryError::ValidationError))
            .transpose()
    }

    async fn find_result(&self, result_id: Uuid) -> Result<Option<SearchResult>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            search_results::table
                .find(result_id)
                .select(SearchResultModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(model.map(SearchResult::from))
    }

    async fn update_result(&self, result: &SearchResult) -> Result<(), RepositoryError> {
        let result_id = result.id();
        let clicked = result.clicked();
        let clicked_at = result.clicked_at();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(search_results::table.find(result_id))
                .set((
                    search_results::clicked.eq(clicked),
                    search_results::clicked_at.eq(clicked_at),
                ))
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(result_id));
        }
        Ok(())
    }
}
