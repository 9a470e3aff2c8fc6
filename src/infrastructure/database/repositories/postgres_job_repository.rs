use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::{JobRepository, RepositoryError};
use crate::domain::value_objects::JobStatus;
use crate::infrastructure::database::models::{JobModel, NewJobModel, UpdateJobModel};
use crate::infrastructure::database::schema::processing_jobs;
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresJobRepository {
    pool: DbPool,
}

impl PostgresJobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: JobModel) -> Result<ProcessingJob, RepositoryError> {
    ProcessingJob::try_from(model).map_err(|e| {
        RepositoryError::ValidationError(format!("Failed to convert job model: {}", e))
    })
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn save(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        let new_job = NewJobModel::try_from(job).map_err(RepositoryError::ValidationError)?;

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(processing_jobs::table)
                .values(&new_job)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<ProcessingJob>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            processing_jobs::table
                .filter(processing_jobs::id.eq(job_id))
                .select(JobModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_file_id(&self, file_id: Uuid) -> Result<Vec<ProcessingJob>, RepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            processing_jobs::table
                .filter(processing_jobs::file_id.eq(file_id))
                .order(processing_jobs::created_at.desc())
                .select(JobModel::as_select())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        let changes = UpdateJobModel::try_from(job).map_err(RepositoryError::ValidationError)?;
        let job_id = job.id();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(processing_jobs::table.filter(processing_jobs::id.eq(job_id)))
                .set(&changes)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(job_id));
        }
        Ok(())
    }

    async fn update_unless_cancelled(&self, job: &ProcessingJob) -> Result<bool, RepositoryError> {
        let changes = UpdateJobModel::try_from(job).map_err(RepositoryError::ValidationError)?;
        let job_id = job.id();

        let (updated, exists) = run_blocking(&self.pool, move |conn| {
            let updated = diesel::update(
                processing_jobs::table
                    .filter(processing_jobs::id.eq(job_id))
                    .filter(processing_jobs::status.ne(JobStatus::Cancelled.as_str())),
            )
            .set(&changes)
            .execute(conn)
            .map_err(map_diesel_error)?;

            if updated > 0 {
                return Ok((updated, true));
            }
            let exists = diesel::select(diesel::dsl::exists(
                processing_jobs::table.filter(processing_jobs::id.eq(job_id)),
            ))
            .get_result::<bool>(conn)
            .map_err(map_diesel_error)?;
            Ok((updated, exists))
        })
        .await?;

        if !exists {
            return Err(RepositoryError::NotFound(job_id));
        }
        Ok(updated > 0)
    }
}
