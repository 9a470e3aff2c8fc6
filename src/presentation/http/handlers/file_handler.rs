use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    DeleteFileUseCase, GetFileUseCase, UploadFileUseCase, upload_file::UploadFileRequest,
};
use crate::presentation::http::dto::{
    ApiResponse, FileDetailsDto, MessageResponseDto, UploadResponseDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

struct UploadedPart {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

pub struct FileHandler {
    upload_use_case: Arc<UploadFileUseCase>,
    get_file_use_case: Arc<GetFileUseCase>,
    delete_file_use_case: Arc<DeleteFileUseCase>,
}

impl FileHandler {
    pub fn new(
        upload_use_case: Arc<UploadFileUseCase>,
        get_file_use_case: Arc<GetFileUseCase>,
        delete_file_use_case: Arc<DeleteFileUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            get_file_use_case,
            delete_file_use_case,
        }
    }

    /// Multipart fields: `projectId`, `file`, and optionally `process` and
    /// `durationSeconds`, in any order.
    pub async fn upload_file(
        State(handler): State<Arc<FileHandler>>,
        Extension(auth): Extension<AuthUser>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, AppError> {
        let mut project_id: Option<Uuid> = None;
        let mut process = false;
        let mut duration_seconds: Option<f64> = None;
        let mut upload: Option<UploadedPart> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field
                        .file_name()
                        .ok_or_else(|| AppError::BadRequest("File part has no filename".to_string()))?
                        .to_string();
                    let content_type = field.content_type().map(|ct| ct.to_string());
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                    upload = Some(UploadedPart {
                        file_name,
                        content_type,
                        data,
                    });
                }
                "projectId" => {
                    let text = field_text(field).await?;
                    project_id = Some(
                        Uuid::parse_str(text.trim())
                            .map_err(|_| AppError::BadRequest("Invalid projectId".to_string()))?,
                    );
                }
                "process" => {
                    let text = field_text(field).await?;
                    process = matches!(text.trim(), "true" | "1" | "yes");
                }
                "durationSeconds" => {
                    let text = field_text(field).await?;
                    duration_seconds = Some(text.trim().parse().map_err(|_| {
                        AppError::BadRequest("Invalid durationSeconds".to_string())
                    })?);
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown multipart field");
                }
            }
        }

        let project_id =
            project_id.ok_or_else(|| AppError::BadRequest("projectId is required".to_string()))?;
        let upload = upload
            .ok_or_else(|| AppError::BadRequest("No file provided in the request".to_string()))?;

        let response = handler
            .upload_use_case
            .execute(UploadFileRequest {
                project_id,
                user_id: auth.user_id,
                file_name: upload.file_name,
                file_data: upload.data,
                content_type: upload.content_type,
                duration_seconds,
                process,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(UploadResponseDto::from(response))),
        ))
    }

    pub async fn get_file(
        State(handler): State<Arc<FileHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let details = handler
            .get_file_use_case
            .execute(file_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(FileDetailsDto::from(details))),
        ))
    }

    pub async fn delete_file(
        State(handler): State<Arc<FileHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        handler
            .delete_file_use_case
            .execute(file_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: "File deleted".to_string(),
            })),
        ))
    }
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::AccessControl;
    use crate::application::testing::{
        InMemoryFileRepository, InMemoryFileStorage, InMemoryInvitationRepository,
        InMemoryJobQueue, InMemoryJobRepository, InMemoryProjectRepository, InMemorySearchCache,
    };
    use crate::application::use_cases::QueueProcessingJobUseCase;
    use crate::domain::entities::Project;
    use crate::domain::repositories::ProjectRepository;
    use axum::{Router, body::Body, http::Request, routing::post};
    use tower::ServiceExt;

    const BOUNDARY: &str = "memoryfinderboundary";

    fn multipart_body(project_id: Uuid, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"projectId\"\r\n\r\n{p}\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"vows.mp4\"\r\n\
                 Content-Type: video/mp4\r\n\r\n",
                b = BOUNDARY,
                p = project_id
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[tokio::test]
    async fn test_upload_stores_file_bytes_unchanged() {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let storage = Arc::new(InMemoryFileStorage::default());
        let jobs = Arc::new(InMemoryJobRepository::default());
        let owner = Uuid::new_v4();
        let project = Project::new(owner, "Uploads".to_string(), None, None, None).unwrap();
        projects.save(&project).await.unwrap();

        let access = Arc::new(AccessControl::new(
            projects,
            Arc::new(InMemoryInvitationRepository::default()),
        ));
        let queue = Arc::new(QueueProcessingJobUseCase::new(
            access.clone(),
            jobs.clone(),
            Arc::new(InMemoryJobQueue::default()),
            files.clone(),
        ));
        let handler = Arc::new(FileHandler::new(
            Arc::new(UploadFileUseCase::new(
                access.clone(),
                files.clone(),
                storage.clone(),
                queue,
            )),
            Arc::new(GetFileUseCase::new(
                access.clone(),
                files.clone(),
                jobs,
                storage.clone(),
                3600,
            )),
            Arc::new(DeleteFileUseCase::new(
                access,
                files,
                storage.clone(),
                Arc::new(InMemorySearchCache::default()),
            )),
        ));
        let app = Router::new()
            .route("/upload", post(FileHandler::upload_file))
            .layer(Extension(AuthUser { user_id: owner }))
            .with_state(handler);

        let footage: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(multipart_body(project.id(), &footage)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let file_id: Uuid = json["data"]["file"]["id"].as_str().unwrap().parse().unwrap();

        assert_eq!(storage.stored(file_id).unwrap(), footage);
    }
}
