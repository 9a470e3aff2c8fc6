use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::JobQueue;
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::JobError;
use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::{FileRepository, JobRepository};

/// Cancels a pending or running job. A running job stops at its next step
/// boundary.
pub struct CancelJobUseCase {
    access_control: Arc<AccessControl>,
    job_repository: Arc<dyn JobRepository>,
    file_repository: Arc<dyn FileRepository>,
    job_queue: Arc<dyn JobQueue>,
}

impl CancelJobUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        job_repository: Arc<dyn JobRepository>,
        file_repository: Arc<dyn FileRepository>,
        job_queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            access_control,
            job_repository,
            file_repository,
            job_queue,
        }
    }

    pub async fn execute(&self, job_id: Uuid, user_id: Uuid) -> Result<ProcessingJob, JobError> {
        let mut job = self
            .job_repository
            .find_by_id(job_id)
            .await?
            .ok_or(JobError::NotFound(job_id))?;
        let file = self
            .file_repository
            .find_by_id(job.file_id())
            .await?
            .ok_or(JobError::FileNotFound(job.file_id()))?;
        self.access_control
            .require_owner(file.project_id(), user_id)
            .await?;

        if job.status().is_pending() {
            // Not in the queue any more is fine; the worker skips cancelled jobs.
            let _ = self.job_queue.remove_job(job_id).await;
        }

        job.cancel().map_err(JobError::NotCancellable)?;
        self.job_repository.update(&job).await?;

        tracing::info!(%job_id, "Processing job cancelled");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryFileRepository, InMemoryInvitationRepository, InMemoryJobQueue,
        InMemoryJobRepository, InMemoryProjectRepository, sample_file,
    };
    use crate::domain::entities::{JobResult, Project};
    use crate::domain::repositories::ProjectRepository;

    #[tokio::test]
    async fn test_cancel_pending_and_reject_finished() {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let jobs = Arc::new(InMemoryJobRepository::default());
        let queue = Arc::new(InMemoryJobQueue::default());
        let owner = Uuid::new_v4();
        let project = Project::new(owner, "Cancel".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();
        let file = sample_file(project.id());
        files.save(&file).await.unwrap();

        let pending = ProcessingJob::new(file.id());
        jobs.save(&pending).await.unwrap();
        queue.enqueue(pending.clone()).await.unwrap();

        let mut finished = ProcessingJob::new(file.id());
        finished.start_processing().unwrap();
        finished
            .complete_processing(JobResult {
                moments_created: 1,
                embeddings_generated: 1,
                fallback_embeddings: 0,
                thumbnails: 1,
                processing_time_ms: 10,
            })
            .unwrap();
        jobs.save(&finished).await.unwrap();

        let access = Arc::new(AccessControl::new(
            projects,
            Arc::new(InMemoryInvitationRepository::default()),
        ));
        let use_case = CancelJobUseCase::new(access, jobs, files, queue.clone());

        let cancelled = use_case.execute(pending.id(), owner).await.unwrap();
        assert!(cancelled.status().is_cancelled());
        assert!(queue.queued_ids().is_empty());

        let result = use_case.execute(finished.id(), owner).await;
        assert!(matches!(result, Err(JobError::NotCancellable(_))));
    }
}
