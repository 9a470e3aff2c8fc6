use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::use_cases::errors::JobError;
use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::{FileRepository, JobRepository};

pub struct GetJobStatusUseCase {
    access_control: Arc<AccessControl>,
    job_repository: Arc<dyn JobRepository>,
    file_repository: Arc<dyn FileRepository>,
}

impl GetJobStatusUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        job_repository: Arc<dyn JobRepository>,
        file_repository: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            access_control,
            job_repository,
            file_repository,
        }
    }

    pub async fn execute(&self, job_id: Uuid, user_id: Uuid) -> Result<ProcessingJob, JobError> {
        let job = self.current(job_id).await?;
        self.authorize_file(job.file_id(), user_id).await?;
        Ok(job)
    }

    /// Latest state of a job the caller was already authorized for.
    pub async fn current(&self, job_id: Uuid) -> Result<ProcessingJob, JobError> {
        self.job_repository
            .find_by_id(job_id)
            .await?
            .ok_or(JobError::NotFound(job_id))
    }

    pub async fn jobs_for_file(
        &self,
        file_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<ProcessingJob>, JobError> {
        self.authorize_file(file_id, user_id).await?;
        Ok(self.job_repository.find_by_file_id(file_id).await?)
    }

    async fn authorize_file(&self, file_id: Uuid, user_id: Uuid) -> Result<(), JobError> {
        let file = self
            .file_repository
            .find_by_id(file_id)
            .await?
            .ok_or(JobError::FileNotFound(file_id))?;
        self.access_control
            .require_access(file.project_id(), user_id)
            .await?;
        Ok(())
    }
}
