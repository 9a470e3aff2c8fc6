use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::CompilationHandler;
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn compilation_routes(
    compilation_handler: Arc<CompilationHandler>,
    auth: Arc<AuthState>,
) -> Router {
    Router::new()
        .route(
            "/compilation",
            get(CompilationHandler::list_compilations).post(CompilationHandler::create_compilation),
        )
        .route(
            "/compilation/{compilation_id}/status",
            get(CompilationHandler::compilation_status),
        )
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware))
        .with_state(compilation_handler)
}
