use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn save(&self, job: &ProcessingJob) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<ProcessingJob>, RepositoryError>;
    async fn find_by_file_id(&self, file_id: Uuid) -> Result<Vec<ProcessingJob>, RepositoryError>;
    async fn update(&self, job: &ProcessingJob) -> Result<(), RepositoryError>;
    /// Writes the job unless the stored row is already cancelled. Returns
    /// `false` when the cancellation won.
    async fn update_unless_cancelled(&self, job: &ProcessingJob) -> Result<bool, RepositoryError>;
}
