use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    SearchMomentsUseCase, TrackSearchClickUseCase, search_moments::SearchMomentsRequest,
};
use crate::presentation::http::dto::{
    ApiResponse, SearchClickDto, SearchRequestDto, SearchResponseDto,
};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct SearchHandler {
    search_use_case: Arc<SearchMomentsUseCase>,
    track_click_use_case: Arc<TrackSearchClickUseCase>,
}

impl SearchHandler {
    pub fn new(
        search_use_case: Arc<SearchMomentsUseCase>,
        track_click_use_case: Arc<TrackSearchClickUseCase>,
    ) -> Self {
        Self {
            search_use_case,
            track_click_use_case,
        }
    }

    pub async fn search_semantic(
        State(handler): State<Arc<SearchHandler>>,
        Extension(auth): Extension<AuthUser>,
        Json(request): Json<SearchRequestDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let query = request.query.clone();
        let outcome = handler
            .search_use_case
            .execute(SearchMomentsRequest {
                project_id: request.project_id,
                user_id: auth.user_id,
                query: request.query,
                limit: request.limit,
                threshold: request.threshold,
            })
            .await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(SearchResponseDto::new(query, outcome))),
        ))
    }

    pub async fn track_click(
        State(handler): State<Arc<SearchHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(result_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, AppError> {
        let result = handler
            .track_click_use_case
            .execute(result_id, auth.user_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(SearchClickDto::from(&result))),
        ))
    }
}
