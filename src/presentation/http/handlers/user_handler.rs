use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::LookupUserUseCase;
use crate::presentation::http::dto::{ApiResponse, UserDto, UserLookupQuery};
use crate::presentation::http::errors::AppError;
use crate::presentation::http::middleware::AuthUser;

pub struct UserHandler {
    lookup_user_use_case: Arc<LookupUserUseCase>,
}

impl UserHandler {
    pub fn new(lookup_user_use_case: Arc<LookupUserUseCase>) -> Self {
        Self {
            lookup_user_use_case,
        }
    }

    pub async fn me(
        State(handler): State<Arc<UserHandler>>,
        Extension(auth): Extension<AuthUser>,
    ) -> Result<impl IntoResponse, AppError> {
        let user = handler
            .lookup_user_use_case
            .by_id(auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(UserDto::from(&user)))))
    }

    pub async fn lookup(
        State(handler): State<Arc<UserHandler>>,
        Query(query): Query<UserLookupQuery>,
    ) -> Result<impl IntoResponse, AppError> {
        let user = handler.lookup_user_use_case.by_email(&query.email).await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(UserDto::from(&user)))))
    }
}
