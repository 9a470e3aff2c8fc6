use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::application::ports::file_storage::SignedUrl;
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::FileError;
use crate::domain::entities::{File, ProcessingJob};
use crate::domain::repositories::{FileRepository, JobRepository};

#[derive(Debug, Clone)]
pub struct FileDetails {
    pub file: File,
    pub media_url: SignedUrl,
    pub latest_job: Option<ProcessingJob>,
}

pub struct GetFileUseCase {
    access_control: Arc<AccessControl>,
    file_repository: Arc<dyn FileRepository>,
    job_repository: Arc<dyn JobRepository>,
    file_storage: Arc<dyn FileStorage>,
    url_ttl_secs: i64,
}

impl GetFileUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        file_repository: Arc<dyn FileRepository>,
        job_repository: Arc<dyn JobRepository>,
        file_storage: Arc<dyn FileStorage>,
        url_ttl_secs: i64,
    ) -> Self {
        Self {
            access_control,
            file_repository,
            job_repository,
            file_storage,
            url_ttl_secs,
        }
    }

    pub async fn execute(&self, file_id: Uuid, user_id: Uuid) -> Result<FileDetails, FileError> {
        let file = self
            .file_repository
            .find_by_id(file_id)
            .await?
            .ok_or(FileError::NotFound(file_id))?;
        self.access_control
            .require_access(file.project_id(), user_id)
            .await?;

        let latest_job = self
            .job_repository
            .find_by_file_id(file_id)
            .await?
            .into_iter()
            .max_by_key(|job| job.created_at());

        Ok(FileDetails {
            media_url: self.file_storage.signed_url(file_id, self.url_ttl_secs),
            file,
            latest_job,
        })
    }
}
