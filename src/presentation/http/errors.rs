use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::ports::file_storage::FileStorageError;
use crate::application::ports::media_analysis::MediaAnalysisError;
use crate::application::services::access_control::AccessError;
use crate::application::services::compilation_service::CompilationServiceError;
use crate::application::services::embedding_service::EmbeddingServiceError;
use crate::application::services::ingestion_service::IngestionError;
use crate::application::services::search_service::SearchServiceError;
use crate::application::use_cases::{
    CompilationError, FileError, InvitationFlowError, JobError, ProjectError, SearchError,
    UserError,
};
use crate::domain::repositories::RepositoryError;
use crate::presentation::http::dto::ApiResponse;

/// Error returned by every handler, rendered as an `ApiResponse` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Gone(String),
    #[error("{0}")]
    RangeNotSatisfiable(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gone(_) => StatusCode::GONE,
            AppError::RangeNotSatisfiable(_) => StatusCode::RANGE_NOT_SATISFIABLE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Gone(_) => "GONE",
            AppError::RangeNotSatisfiable(_) => "RANGE_NOT_SATISFIABLE",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }
        let body = ApiResponse::<()>::error(self.code().to_string(), self.to_string(), None);
        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => AppError::NotFound(format!("Not found: {}", id)),
            RepositoryError::ValidationError(msg) => AppError::BadRequest(msg),
            RepositoryError::DuplicateError(msg) => AppError::Conflict(msg),
            RepositoryError::DatabaseError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(error: AccessError) -> Self {
        match error {
            AccessError::ProjectNotFound(_) => AppError::NotFound(error.to_string()),
            AccessError::Forbidden | AccessError::OwnerOnly => AppError::Forbidden(error.to_string()),
            AccessError::Repository(e) => e.into(),
        }
    }
}

impl From<FileStorageError> for AppError {
    fn from(error: FileStorageError) -> Self {
        match error {
            FileStorageError::FileNotFound(_) => AppError::NotFound(error.to_string()),
            FileStorageError::InvalidSignature => AppError::Forbidden(error.to_string()),
            _ => AppError::Internal(error.to_string()),
        }
    }
}

impl From<EmbeddingServiceError> for AppError {
    fn from(error: EmbeddingServiceError) -> Self {
        match error {
            EmbeddingServiceError::ValidationError(msg) => AppError::BadRequest(msg),
            EmbeddingServiceError::ProviderError(_) => AppError::Internal(error.to_string()),
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(error: ProjectError) -> Self {
        match error {
            ProjectError::ValidationError(msg) => AppError::BadRequest(msg),
            ProjectError::Access(e) => e.into(),
            ProjectError::Repository(e) => e.into(),
        }
    }
}

impl From<UserError> for AppError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound(_) => AppError::NotFound(error.to_string()),
            UserError::ValidationError(msg) => AppError::BadRequest(msg),
            UserError::Repository(e) => e.into(),
        }
    }
}

impl From<JobError> for AppError {
    fn from(error: JobError) -> Self {
        match error {
            JobError::NotFound(_) | JobError::FileNotFound(_) => {
                AppError::NotFound(error.to_string())
            }
            JobError::AlreadyActive(_) | JobError::NotCancellable(_) => {
                AppError::Conflict(error.to_string())
            }
            JobError::Queue(_) => AppError::Internal(error.to_string()),
            JobError::Access(e) => e.into(),
            JobError::Repository(e) => e.into(),
        }
    }
}

impl From<FileError> for AppError {
    fn from(error: FileError) -> Self {
        match error {
            FileError::NotFound(_) => AppError::NotFound(error.to_string()),
            FileError::ValidationError(msg) => AppError::BadRequest(msg),
            FileError::Duplicate(_) => AppError::Conflict(error.to_string()),
            FileError::Storage(e) => e.into(),
            FileError::Job(e) => e.into(),
            FileError::Access(e) => e.into(),
            FileError::Repository(e) => e.into(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::ResultNotFound(_) => AppError::NotFound(error.to_string()),
            SearchError::Search(SearchServiceError::ValidationError(msg)) => {
                AppError::BadRequest(msg)
            }
            SearchError::Search(SearchServiceError::Embedding(e)) => e.into(),
            SearchError::Search(SearchServiceError::Repository(e)) => e.into(),
            SearchError::Access(e) => e.into(),
            SearchError::Repository(e) => e.into(),
        }
    }
}

impl From<CompilationError> for AppError {
    fn from(error: CompilationError) -> Self {
        match error {
            CompilationError::NotFound(_) => AppError::NotFound(error.to_string()),
            CompilationError::Compilation(e) => match e {
                CompilationServiceError::ValidationError(msg) => AppError::BadRequest(msg),
                CompilationServiceError::NoMatches(_) => AppError::NotFound(e.to_string()),
                CompilationServiceError::NothingFits(_) => AppError::BadRequest(e.to_string()),
                CompilationServiceError::Transcoder(_) => AppError::Internal(e.to_string()),
                CompilationServiceError::Repository(e) => e.into(),
            },
            CompilationError::Access(e) => e.into(),
            CompilationError::Repository(e) => e.into(),
        }
    }
}

impl From<InvitationFlowError> for AppError {
    fn from(error: InvitationFlowError) -> Self {
        match error {
            InvitationFlowError::NotFound => AppError::NotFound(error.to_string()),
            InvitationFlowError::Expired => AppError::Gone(error.to_string()),
            InvitationFlowError::AlreadyResponded(_) => AppError::Conflict(error.to_string()),
            InvitationFlowError::ValidationError(msg) => AppError::BadRequest(msg),
            InvitationFlowError::Access(e) => e.into(),
            InvitationFlowError::Repository(e) => e.into(),
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::FileNotFound(_) => AppError::NotFound(error.to_string()),
            IngestionError::ValidationError(msg) => AppError::BadRequest(msg),
            IngestionError::Analysis(MediaAnalysisError::NotConfigured) => {
                AppError::ServiceUnavailable(error.to_string())
            }
            IngestionError::Embedding(e) => e.into(),
            IngestionError::Repository(e) => e.into(),
            IngestionError::TranscriptionFailed(_)
            | IngestionError::TranscriptionTimedOut(_)
            | IngestionError::Analysis(_) => AppError::Internal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (AccessError::OwnerOnly.into(), StatusCode::FORBIDDEN),
            (
                AccessError::ProjectNotFound(Uuid::new_v4()).into(),
                StatusCode::NOT_FOUND,
            ),
            (FileError::Duplicate(Uuid::new_v4()).into(), StatusCode::CONFLICT),
            (JobError::AlreadyActive(Uuid::new_v4()).into(), StatusCode::CONFLICT),
            (InvitationFlowError::Expired.into(), StatusCode::GONE),
            (
                IngestionError::Analysis(MediaAnalysisError::NotConfigured).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CompilationError::Compilation(CompilationServiceError::NoMatches("x".into()))
                    .into(),
                StatusCode::NOT_FOUND,
            ),
            (
                RepositoryError::DatabaseError("pool exhausted".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{:?}", error);
        }
    }

    #[tokio::test]
    async fn test_error_renders_envelope() {
        let response = AppError::Gone("Invitation has expired".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::GONE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "GONE");
        assert_eq!(json["error"]["message"], "Invitation has expired");
    }
}
