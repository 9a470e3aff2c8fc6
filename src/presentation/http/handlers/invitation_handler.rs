use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::RespondToInvitationUseCase;
use crate::presentation::http::dto::{ApiResponse, InvitationDto};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct InvitationHandler {
    respond_use_case: Arc<RespondToInvitationUseCase>,
}

impl InvitationHandler {
    pub fn new(respond_use_case: Arc<RespondToInvitationUseCase>) -> Self {
        Self { respond_use_case }
    }

    /// Public: the invite link is opened before the couple has signed in.
    pub async fn get_invitation(
        State(handler): State<Arc<InvitationHandler>>,
        Path(token): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let details = handler.respond_use_case.get(&token).await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(InvitationDto::from(details)))))
    }

    pub async fn accept_invitation(
        State(handler): State<Arc<InvitationHandler>>,
        Extension(auth): Extension<AuthUser>,
        Path(token): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let details = handler
            .respond_use_case
            .accept(&token, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(InvitationDto::from(details)))))
    }

    pub async fn decline_invitation(
        State(handler): State<Arc<InvitationHandler>>,
        Path(token): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let details = handler.respond_use_case.decline(&token).await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(InvitationDto::from(details)))))
    }
}
