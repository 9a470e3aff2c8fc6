use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::UserHandler;
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn user_routes(user_handler: Arc<UserHandler>, auth: Arc<AuthState>) -> Router {
    let private = Router::new()
        .route("/me", get(UserHandler::me))
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware));

    Router::new()
        .route("/users/lookup", get(UserHandler::lookup))
        .merge(private)
        .with_state(user_handler)
}
