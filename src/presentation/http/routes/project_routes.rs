use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ProjectHandler;
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn project_routes(project_handler: Arc<ProjectHandler>, auth: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/projects",
            get(ProjectHandler::list_projects).post(ProjectHandler::create_project),
        )
        .route("/projects/share", post(ProjectHandler::share_project))
        .route(
            "/projects/{project_id}",
            get(ProjectHandler::get_project)
                .patch(ProjectHandler::update_project)
                .delete(ProjectHandler::delete_project),
        )
        .route("/projects/{project_id}/files", get(ProjectHandler::list_files))
        .route(
            "/projects/{project_id}/moments",
            get(ProjectHandler::list_moments),
        )
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware))
        .with_state(project_handler)
}
