use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    CancelJobUseCase, GetJobStatusUseCase, QueueProcessingJobUseCase,
};
use crate::presentation::http::dto::{
    ApiResponse, CancelJobResponseDto, JobStatusDto, QueueJobResponseDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct JobHandler {
    queue_job_use_case: Arc<QueueProcessingJobUseCase>,
    get_job_status_use_case: Arc<GetJobStatusUseCase>,
    cancel_job_use_case: Arc<CancelJobUseCase>,
}

impl JobHandler {
    pub fn new(
        queue_job_use_case: Arc<QueueProcessingJobUseCase>,
        get_job_status_use_case: Arc<GetJobStatusUseCase>,
        cancel_job_use_case: Arc<CancelJobUseCase>,
    ) -> Self {
        Self {
            queue_job_use_case,
            get_job_status_use_case,
            cancel_job_use_case,
        }
    }

    pub async fn queue_file_processing(
        State(handler): State<Arc<JobHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let job = handler
            .queue_job_use_case
            .execute(file_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::ACCEPTED,
            Json(ApiResponse::success(QueueJobResponseDto::from(&job))),
        ))
    }

    pub async fn get_job_status(
        State(handler): State<Arc<JobHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(job_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let job = handler
            .get_job_status_use_case
            .execute(job_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(JobStatusDto::from(&job)))))
    }

    pub async fn get_file_jobs(
        State(handler): State<Arc<JobHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let jobs = handler
            .get_job_status_use_case
            .jobs_for_file(file_id, auth.user_id)
            .await?;
        let dto: Vec<JobStatusDto> = jobs.iter().map(JobStatusDto::from).collect();
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn cancel_job(
        State(handler): State<Arc<JobHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(job_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let job = handler
            .cancel_job_use_case
            .execute(job_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(CancelJobResponseDto::from(&job))),
        ))
    }
}
