use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    CreateProjectUseCase, DeleteProjectUseCase, GetProjectUseCase, ListFilesUseCase,
    ListMomentsUseCase, ListProjectsUseCase, ShareProjectUseCase, UpdateProjectUseCase,
    create_project::CreateProjectRequest, share_project::ShareProjectRequest,
};
use crate::domain::entities::{ProjectChanges, ProjectStatus};
use crate::domain::repositories::MomentFilter;
use crate::domain::value_objects::MomentKind;
use crate::presentation::http::dto::{
    ApiResponse, CreateProjectRequestDto, FileResponseDto, MessageResponseDto,
    MomentListResponseDto, MomentQueryDto, ProjectDto, ShareProjectRequestDto,
    ShareProjectResponseDto, UpdateProjectRequestDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct ProjectHandler {
    create_project_use_case: Arc<CreateProjectUseCase>,
    list_projects_use_case: Arc<ListProjectsUseCase>,
    get_project_use_case: Arc<GetProjectUseCase>,
    update_project_use_case: Arc<UpdateProjectUseCase>,
    delete_project_use_case: Arc<DeleteProjectUseCase>,
    list_files_use_case: Arc<ListFilesUseCase>,
    list_moments_use_case: Arc<ListMomentsUseCase>,
    share_project_use_case: Arc<ShareProjectUseCase>,
}

impl ProjectHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_project_use_case: Arc<CreateProjectUseCase>,
        list_projects_use_case: Arc<ListProjectsUseCase>,
        get_project_use_case: Arc<GetProjectUseCase>,
        update_project_use_case: Arc<UpdateProjectUseCase>,
        delete_project_use_case: Arc<DeleteProjectUseCase>,
        list_files_use_case: Arc<ListFilesUseCase>,
        list_moments_use_case: Arc<ListMomentsUseCase>,
        share_project_use_case: Arc<ShareProjectUseCase>,
    ) -> Self {
        Self {
            create_project_use_case,
            list_projects_use_case,
            get_project_use_case,
            update_project_use_case,
            delete_project_use_case,
            list_files_use_case,
            list_moments_use_case,
            share_project_use_case,
        }
    }

    pub async fn list_projects(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
    ) -> Result<impl IntoResponse, AppError> {
        let projects = handler.list_projects_use_case.execute(auth.user_id).await?;
        let dto: Vec<ProjectDto> = projects.iter().map(ProjectDto::from).collect();
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn create_project(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Json(request): Json<CreateProjectRequestDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let project = handler
            .create_project_use_case
            .execute(CreateProjectRequest {
                owner_id: auth.user_id,
                name: request.name,
                couple_names: request.couple_names,
                wedding_date: request.wedding_date,
                venue: request.venue,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(ProjectDto::from(&project))),
        ))
    }

    pub async fn get_project(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(project_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let project = handler
            .get_project_use_case
            .execute(project_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(ProjectDto::from(&project)))))
    }

    pub async fn update_project(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(project_id): Path<Uuid>,
        Json(request): Json<UpdateProjectRequestDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let status = request
            .status
            .as_deref()
            .map(str::parse::<ProjectStatus>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        let project = handler
            .update_project_use_case
            .execute(
                project_id,
                auth.user_id,
                ProjectChanges {
                    name: request.name,
                    couple_names: request.couple_names,
                    wedding_date: request.wedding_date,
                    venue: request.venue,
                    status,
                },
            )
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(ProjectDto::from(&project)))))
    }

    pub async fn delete_project(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(project_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        handler
            .delete_project_use_case
            .execute(project_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: "Project deleted".to_string(),
            })),
        ))
    }

    pub async fn list_files(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(project_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let files = handler
            .list_files_use_case
            .execute(project_id, auth.user_id)
            .await?;
        let dto: Vec<FileResponseDto> = files.iter().map(FileResponseDto::from).collect();
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn list_moments(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(project_id): Path<Uuid>,
        Query(query): Query<MomentQueryDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let kind = query
            .content_type
            .as_deref()
            .map(str::parse::<MomentKind>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        let page = handler
            .list_moments_use_case
            .execute(
                project_id,
                auth.user_id,
                MomentFilter {
                    kind,
                    file_id: query.file_id,
                    offset: query.offset,
                    limit: query.limit,
                },
            )
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MomentListResponseDto::from(page))),
        ))
    }

    pub async fn share_project(
        State(handler): State<Arc<ProjectHandler>>,
        Extension(auth): Extension<AuthUser>,
        Json(request): Json<ShareProjectRequestDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let shared = handler
            .share_project_use_case
            .execute(ShareProjectRequest {
                project_id: request.project_id,
                invited_by: auth.user_id,
                email: request.email,
                message: request.message,
            })
            .await?;

        let dto = ShareProjectResponseDto {
            invitation_id: shared.invitation.id(),
            email: shared.invitation.email().to_string(),
            invite_url: shared.invite_url,
            email_sent: shared.email_sent,
        };
        Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
    }
}
