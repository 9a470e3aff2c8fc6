use axum::{Router, middleware, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::SearchHandler;
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn search_routes(search_handler: Arc<SearchHandler>, auth: Arc<AuthState>) -> Router {
    Router::new()
        .route("/search-semantic", post(SearchHandler::search_semantic))
        .route(
            "/search-results/{result_id}/click",
            post(SearchHandler::track_click),
        )
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware))
        .with_state(search_handler)
}
