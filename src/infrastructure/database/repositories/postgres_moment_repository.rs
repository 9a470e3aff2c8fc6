use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Double, Integer, Jsonb, Text, Uuid as SqlUuid};
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::VideoMoment;
use crate::domain::repositories::{MomentFilter, MomentRepository, RepositoryError, ScoredMoment};
use crate::infrastructure::database::models::{
    MomentMatchRow, MomentModel, NewMomentModel, vector_to_json,
};
use crate::infrastructure::database::schema::video_moments;
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresMomentRepository {
    pool: DbPool,
}

impl PostgresMomentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: MomentModel) -> Result<VideoMoment, RepositoryError> {
    VideoMoment::try_from(model).map_err(RepositoryError::ValidationError)
}

/// Escapes `%`, `_` and the escape character so user text matches literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl MomentRepository for PostgresMomentRepository {
    async fn replace_for_file(
        &self,
        file_id: Uuid,
        moments: &[VideoMoment],
    ) -> Result<usize, RepositoryError> {
        let new_moments: Vec<NewMomentModel> = moments.iter().map(NewMomentModel::from).collect();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<usize, diesel::result::Error, _>(|conn| {
                diesel::delete(video_moments::table.filter(video_moments::file_id.eq(file_id)))
                    .execute(conn)?;
                if new_moments.is_empty() {
                    return Ok(0);
                }
                diesel::insert_into(video_moments::table)
                    .values(&new_moments)
                    .execute(conn)
            })
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_by_project(
        &self,
        project_id: Uuid,
        filter: &MomentFilter,
    ) -> Result<(Vec<VideoMoment>, i64), RepositoryError> {
        let filter = filter.clone();

        let (models, total) = run_blocking(&self.pool, move |conn| {
            let filtered = || {
                let mut query = video_moments::table
                    .filter(video_moments::project_id.eq(project_id))
                    .into_boxed::<diesel::pg::Pg>();
                if let Some(kind) = filter.kind {
                    query = query.filter(video_moments::content_type.eq(kind.as_str()));
                }
                if let Some(file_id) = filter.file_id {
                    query = query.filter(video_moments::file_id.eq(file_id));
                }
                query
            };

            let total: i64 = filtered()
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;
            let models = filtered()
                .order((video_moments::file_id.asc(), video_moments::start_time_seconds.asc()))
                .offset(filter.offset)
                .limit(filter.limit)
                .select(MomentModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;
            Ok((models, total))
        })
        .await?;

        let moments = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((moments, total))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VideoMoment>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();

        let models = run_blocking(&self.pool, move |conn| {
            video_moments::table
                .filter(video_moments::id.eq_any(ids))
                .select(MomentModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn search_similar(
        &self,
        project_id: Uuid,
        query_embedding: &Vector,
        threshold: f64,
        limit: i64,
    ) -> Result<Vec<ScoredMoment>, RepositoryError> {
        let embedding = vector_to_json(query_embedding);
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);

        let matches = run_blocking(&self.pool, move |conn| {
            diesel::sql_query(
                "SELECT moment_id, similarity FROM search_video_moments($1, $2, $3, $4)",
            )
            .bind::<Jsonb, _>(embedding)
            .bind::<SqlUuid, _>(project_id)
            .bind::<Double, _>(threshold)
            .bind::<Integer, _>(limit)
            .load::<MomentMatchRow>(conn)
            .map_err(map_diesel_error)
        })
        .await?;

        let ids: Vec<Uuid> = matches.iter().map(|m| m.moment_id).collect();
        let mut moments: HashMap<Uuid, VideoMoment> = self
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|m| (m.id(), m))
            .collect();

        // Keep the function's similarity ordering.
        Ok(matches
            .into_iter()
            .filter_map(|row| {
                moments.remove(&row.moment_id).map(|moment| ScoredMoment {
                    moment,
                    similarity: row.similarity,
                })
            })
            .collect())
    }

    async fn search_text(
        &self,
        project_id: Uuid,
        query: &str,
    ) -> Result<Vec<VideoMoment>, RepositoryError> {
        let pattern = like_pattern(query.trim());

        let models = run_blocking(&self.pool, move |conn| {
            diesel::sql_query(
                "SELECT * FROM video_moments \
                 WHERE project_id = $1 \
                   AND (description ILIKE $2 \
                        OR transcript ILIKE $2 \
                        OR array_to_string(tags, ' ') ILIKE $2) \
                 ORDER BY file_id, start_time_seconds",
            )
            .bind::<SqlUuid, _>(project_id)
            .bind::<Text, _>(pattern)
            .load::<MomentModel>(conn)
            .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }
}
