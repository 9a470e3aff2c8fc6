use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::JobQueue;
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::JobError;
use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::{FileRepository, JobRepository};

pub struct QueueProcessingJobUseCase {
    access_control: Arc<AccessControl>,
    job_repository: Arc<dyn JobRepository>,
    job_queue: Arc<dyn JobQueue>,
    file_repository: Arc<dyn FileRepository>,
}

impl QueueProcessingJobUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        job_repository: Arc<dyn JobRepository>,
        job_queue: Arc<dyn JobQueue>,
        file_repository: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            access_control,
            job_repository,
            job_queue,
            file_repository,
        }
    }

    pub async fn execute(&self, file_id: Uuid, user_id: Uuid) -> Result<ProcessingJob, JobError> {
        let file = self
            .file_repository
            .find_by_id(file_id)
            .await?
            .ok_or(JobError::FileNotFound(file_id))?;
        self.access_control
            .require_owner(file.project_id(), user_id)
            .await?;

        let existing_jobs = self.job_repository.find_by_file_id(file_id).await?;
        if let Some(active) = existing_jobs.iter().find(|job| job.is_active()) {
            return Err(JobError::AlreadyActive(active.id()));
        }

        let job = ProcessingJob::new(file_id);
        self.job_repository.save(&job).await?;
        self.job_queue.enqueue(job.clone()).await?;

        tracing::info!(job_id = %job.id(), %file_id, "Processing job queued");
        Ok(job)
    }
}
