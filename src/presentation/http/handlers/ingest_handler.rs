//! Stateless wrappers around the individual analysis steps, called by
//! external automation with an ingest API key.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::IngestionService;
use crate::presentation::http::dto::{
    ApiResponse, IngestDurationDto, ShotDto, TranscriptionResultDto, TranscriptionStartedDto,
};
use crate::presentation::http::errors::AppError;

pub struct IngestHandler {
    ingestion_service: Arc<IngestionService>,
}

/// The body is optional; an empty body means "use the stored duration".
fn duration_from(body: &Bytes) -> Result<Option<f64>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let dto: IngestDurationDto = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
    Ok(dto.duration_seconds)
}

impl IngestHandler {
    pub fn new(ingestion_service: Arc<IngestionService>) -> Self {
        Self { ingestion_service }
    }

    pub async fn start_transcription(
        State(handler): State<Arc<IngestHandler>>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let job_id = handler.ingestion_service.start_transcription(file_id).await?;
        Ok((
            StatusCode::ACCEPTED,
            Json(ApiResponse::success(TranscriptionStartedDto { job_id })),
        ))
    }

    pub async fn fetch_transcription(
        State(handler): State<Arc<IngestHandler>>,
        Path((file_id, job_id)): Path<(Uuid, String)>,
    ) -> Result<impl IntoResponse, AppError> {
        let state = handler
            .ingestion_service
            .fetch_transcription(file_id, &job_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(TranscriptionResultDto::from(state))),
        ))
    }

    pub async fn detect_labels(
        State(handler): State<Arc<IngestHandler>>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let labels = handler.ingestion_service.detect_labels(file_id).await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(labels))))
    }

    pub async fn detect_faces(
        State(handler): State<Arc<IngestHandler>>,
        Path(file_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let faces = handler.ingestion_service.detect_faces(file_id).await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(faces))))
    }

    pub async fn plan_shots(
        State(handler): State<Arc<IngestHandler>>,
        Path(file_id): Path<Uuid>,
        body: Bytes,
    ) -> Result<impl IntoResponse, AppError> {
        let shots = handler
            .ingestion_service
            .plan_shots(file_id, duration_from(&body)?)
            .await?;
        let dto: Vec<ShotDto> = shots.iter().map(ShotDto::from).collect();
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn plan_thumbnails(
        State(handler): State<Arc<IngestHandler>>,
        Path(file_id): Path<Uuid>,
        body: Bytes,
    ) -> Result<impl IntoResponse, AppError> {
        let thumbnails = handler
            .ingestion_service
            .plan_thumbnails(file_id, duration_from(&body)?)
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(thumbnails))))
    }

    pub async fn build_segments(
        State(handler): State<Arc<IngestHandler>>,
        Path(file_id): Path<Uuid>,
        body: Bytes,
    ) -> Result<impl IntoResponse, AppError> {
        let report = handler
            .ingestion_service
            .build_segments(file_id, duration_from(&body)?)
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(report))))
    }
}
