use uuid::Uuid;

use crate::application::ports::file_storage::FileStorageError;
use crate::application::ports::job_queue::JobQueueError;
use crate::application::services::access_control::AccessError;
use crate::application::services::compilation_service::CompilationServiceError;
use crate::application::services::search_service::SearchServiceError;
use crate::domain::repositories::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),
    #[error("File not found: {0}")]
    FileNotFound(Uuid),
    #[error("File already has an active processing job: {0}")]
    AlreadyActive(Uuid),
    #[error("Job not cancellable: {0}")]
    NotCancellable(String),
    #[error("Queue error: {0}")]
    Queue(#[from] JobQueueError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(Uuid),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("This file was already uploaded to the project as {0}")]
    Duplicate(Uuid),
    #[error("Storage error: {0}")]
    Storage(#[from] FileStorageError),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search result not found: {0}")]
    ResultNotFound(Uuid),
    #[error(transparent)]
    Search(#[from] SearchServiceError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    #[error("Compilation not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Compilation(#[from] CompilationServiceError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum InvitationFlowError {
    #[error("Invitation not found")]
    NotFound,
    #[error("Invitation has expired")]
    Expired,
    #[error("Invitation was already {0}")]
    AlreadyResponded(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<crate::domain::entities::InvitationError> for InvitationFlowError {
    fn from(error: crate::domain::entities::InvitationError) -> Self {
        use crate::domain::entities::InvitationError;
        match error {
            InvitationError::Expired => InvitationFlowError::Expired,
            InvitationError::AlreadyResponded(status) => {
                InvitationFlowError::AlreadyResponded(status.as_str().to_string())
            }
        }
    }
}
