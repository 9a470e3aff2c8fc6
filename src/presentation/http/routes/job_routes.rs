use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::{JobHandler, SseHandler};
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn job_routes(
    job_handler: Arc<JobHandler>,
    sse_handler: Arc<SseHandler>,
    auth: Arc<AuthState>,
) -> Router {
    Router::new()
        .route(
            "/jobs/process/file/{file_id}",
            post(JobHandler::queue_file_processing),
        )
        .route("/jobs/{job_id}", get(JobHandler::get_job_status))
        .route("/jobs/{job_id}/cancel", delete(JobHandler::cancel_job))
        .route("/jobs/file/{file_id}", get(JobHandler::get_file_jobs))
        .nest(
            "/jobs",
            Router::new()
                .route("/{job_id}/stream", get(SseHandler::job_progress_stream))
                .with_state(sse_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware))
        .with_state(job_handler)
}
