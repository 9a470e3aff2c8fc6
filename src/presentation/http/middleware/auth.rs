//! Request authentication.
//!
//! Browser and API callers present a session token, either as
//! `Authorization: Bearer <token>` or in the `mf_session` cookie. The
//! ingestion endpoints are called by automation and use static API keys
//! instead.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::security::SessionTokens;
use crate::presentation::http::errors::AppError;

pub const SESSION_COOKIE: &str = "mf_session";

pub struct AuthState {
    pub sessions: SessionTokens,
    pub ingest_keys: Vec<String>,
}

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

fn cookie_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

pub async fn session_auth_middleware(
    State(state): State<Arc<AuthState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request).or_else(|| cookie_token(&request)) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => {
            return AppError::Unauthorized("Missing session".to_string()).into_response();
        }
    };

    match state.sessions.verify(&token) {
        Ok(user_id) => {
            request.extensions_mut().insert(AuthUser { user_id });
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Unauthorized(format!("Invalid session: {}", e)).into_response()
        }
    }
}

pub async fn ingest_auth_middleware(
    State(state): State<Arc<AuthState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.ingest_keys.is_empty() {
        return AppError::Unauthorized(
            "Ingest API keys not configured. Set INGEST_API_KEYS to enable access.".to_string(),
        )
        .into_response();
    }

    match bearer_token(&request) {
        Some(key) if state.ingest_keys.iter().any(|k| k == key) => next.run(request).await,
        Some(_) => AppError::Unauthorized("Invalid API key".to_string()).into_response(),
        None => AppError::Unauthorized("Missing authorization header".to_string()).into_response(),
    }
}
