use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::application::services::AccessControl;
use crate::application::use_cases::errors::FileError;
use crate::application::use_cases::queue_processing_job::QueueProcessingJobUseCase;
use crate::domain::entities::{File, ProcessingJob};
use crate::domain::repositories::FileRepository;
use crate::domain::value_objects::FileHash;

#[derive(Debug, Clone)]
pub struct UploadFileRequest {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_data: Bytes,
    pub content_type: Option<String>,
    pub duration_seconds: Option<f64>,
    /// Queue a processing job right after the upload.
    pub process: bool,
}

#[derive(Debug, Clone)]
pub struct UploadFileResponse {
    pub file: File,
    pub job: Option<ProcessingJob>,
}

pub struct UploadFileUseCase {
    access_control: Arc<AccessControl>,
    file_repository: Arc<dyn FileRepository>,
    file_storage: Arc<dyn FileStorage>,
    queue_processing_job: Arc<QueueProcessingJobUseCase>,
}

impl UploadFileUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        file_repository: Arc<dyn FileRepository>,
        file_storage: Arc<dyn FileStorage>,
        queue_processing_job: Arc<QueueProcessingJobUseCase>,
    ) -> Self {
        Self {
            access_control,
            file_repository,
            file_storage,
            queue_processing_job,
        }
    }

    pub async fn execute(&self, request: UploadFileRequest) -> Result<UploadFileResponse, FileError> {
        self.access_control
            .require_owner(request.project_id, request.user_id)
            .await?;

        let file_name = request.file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(FileError::ValidationError(
                "File name cannot be empty".to_string(),
            ));
        }
        if request.file_data.is_empty() {
            return Err(FileError::ValidationError(
                "File data cannot be empty".to_string(),
            ));
        }
        if let Some(content_type) = &request.content_type {
            if !is_video_content_type(content_type) {
                return Err(FileError::ValidationError(format!(
                    "Only video uploads are accepted, got {}",
                    content_type
                )));
            }
        }

        let file_hash = FileHash::of(&request.file_data);
        if let Some(existing) = self
            .file_repository
            .find_by_hash(request.project_id, &file_hash)
            .await?
        {
            return Err(FileError::Duplicate(existing.id()));
        }

        let file_id = Uuid::new_v4();
        let stored = self
            .file_storage
            .store_file(file_id, &request.file_data)
            .await?;

        let mut file = File::new(
            file_id,
            request.project_id,
            file_name,
            stored.path,
            request.content_type,
            stored.size as i64,
            file_hash,
        );
        if let Some(seconds) = request.duration_seconds {
            file.set_duration(seconds).map_err(FileError::ValidationError)?;
        }

        if let Err(e) = self.file_repository.save(&file).await {
            let _ = self.file_storage.delete_file(file_id).await;
            return Err(e.into());
        }
        tracing::info!(%file_id, project_id = %request.project_id, size = stored.size, "File uploaded");

        let job = if request.process {
            Some(
                self.queue_processing_job
                    .execute(file_id, request.user_id)
                    .await?,
            )
        } else {
            None
        };

        Ok(UploadFileResponse { file, job })
    }
}

fn is_video_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("video/") || essence == "application/octet-stream"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryFileRepository, InMemoryFileStorage, InMemoryInvitationRepository,
        InMemoryJobQueue, InMemoryJobRepository, InMemoryProjectRepository,
    };
    use crate::domain::entities::Project;
    use crate::domain::repositories::ProjectRepository;

    struct Fixture {
        use_case: UploadFileUseCase,
        storage: Arc<InMemoryFileStorage>,
        owner: Uuid,
        project_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryFileStorage::default());
        let owner = Uuid::new_v4();
        let project = Project::new(owner, "Uploads".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();

        let access = Arc::new(AccessControl::new(
            projects,
            Arc::new(InMemoryInvitationRepository::default()),
        ));
        let queue = Arc::new(QueueProcessingJobUseCase::new(
            access.clone(),
            Arc::new(InMemoryJobRepository::default()),
            Arc::new(InMemoryJobQueue::default()),
            files.clone(),
        ));
        Fixture {
            use_case: UploadFileUseCase::new(access, files, storage.clone(), queue),
            storage,
            owner,
            project_id: project.id(),
        }
    }

    fn request(fx: &Fixture, data: &[u8], process: bool) -> UploadFileRequest {
        UploadFileRequest {
            project_id: fx.project_id,
            user_id: fx.owner,
            file_name: "first-dance.mp4".to_string(),
            file_data: Bytes::copy_from_slice(data),
            content_type: Some("video/mp4".to_string()),
            duration_seconds: Some(95.0),
            process,
        }
    }

    #[tokio::test]
    async fn test_upload_stores_bytes_and_queues_job() {
        let fx = fixture().await;
        let response = fx.use_case.execute(request(&fx, b"reel-1", true)).await.unwrap();

        assert!(fx.storage.contains(response.file.id()));
        assert_eq!(response.file.file_size(), 6);
        assert_eq!(response.file.duration_seconds(), Some(95.0));
        assert!(response.job.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_upload_conflicts() {
        let fx = fixture().await;
        let first = fx.use_case.execute(request(&fx, b"same bytes", false)).await.unwrap();

        let result = fx.use_case.execute(request(&fx, b"same bytes", false)).await;
        assert!(matches!(result, Err(FileError::Duplicate(id)) if id == first.file.id()));
    }

    #[tokio::test]
    async fn test_non_video_is_rejected() {
        let fx = fixture().await;
        let mut req = request(&fx, b"%PDF", false);
        req.content_type = Some("application/pdf".to_string());
        assert!(matches!(
            fx.use_case.execute(req).await,
            Err(FileError::ValidationError(_))
        ));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert!(is_video_content_type("video/quicktime; codecs=avc1"));
        assert!(!is_video_content_type("image/png"));
    }
}
