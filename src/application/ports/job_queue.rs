use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;

#[derive(Debug, thiserror::Error)]
pub enum JobQueueError {
    #[error("Job queue is full")]
    QueueFull,
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Invalid job: {0}")]
    InvalidJob(String),
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job for processing
    async fn enqueue(&self, job: ProcessingJob) -> Result<(), JobQueueError>;

    /// Number of jobs waiting for a worker
    async fn size(&self) -> Result<usize, JobQueueError>;

    /// Drop a job that has not been picked up yet
    async fn remove_job(&self, job_id: Uuid) -> Result<bool, JobQueueError>;
}
