use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::compilation_service::CompilationDraft;
use crate::application::use_cases::{CreateCompilationUseCase, GetCompilationUseCase};
use crate::presentation::http::dto::{
    ApiResponse, CompilationDto, CompilationListQuery, CompilationStatusDto, CompiledReelDto,
    CreateCompilationRequestDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct CompilationHandler {
    create_compilation_use_case: Arc<CreateCompilationUseCase>,
    get_compilation_use_case: Arc<GetCompilationUseCase>,
}

impl CompilationHandler {
    pub fn new(
        create_compilation_use_case: Arc<CreateCompilationUseCase>,
        get_compilation_use_case: Arc<GetCompilationUseCase>,
    ) -> Self {
        Self {
            create_compilation_use_case,
            get_compilation_use_case,
        }
    }

    pub async fn create_compilation(
        State(handler): State<Arc<CompilationHandler>>,
        Extension(auth): Extension<AuthUser>,
        Json(request): Json<CreateCompilationRequestDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let reel = handler
            .create_compilation_use_case
            .execute(CompilationDraft {
                project_id: request.project_id,
                created_by: auth.user_id,
                query: request.query,
                name: request.name,
                max_duration_seconds: request.max_duration,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(CompiledReelDto::from(reel))),
        ))
    }

    pub async fn list_compilations(
        State(handler): State<Arc<CompilationHandler>>,
        Extension(auth): Extension<AuthUser>,
        Query(query): Query<CompilationListQuery>,
    ) -> Result<impl IntoResponse, AppError> {
        let compilations = handler
            .get_compilation_use_case
            .list(query.project_id, auth.user_id)
            .await?;
        let dto: Vec<CompilationDto> = compilations.iter().map(CompilationDto::from).collect();
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn compilation_status(
        State(handler): State<Arc<CompilationHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(compilation_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let details = handler
            .get_compilation_use_case
            .execute(compilation_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(CompilationStatusDto::from(details))),
        ))
    }
}
