use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::IngestHandler;
use crate::presentation::http::middleware::{AuthState, ingest_auth_middleware};

pub fn ingest_routes(ingest_handler: Arc<IngestHandler>, auth: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/ingest/{file_id}/transcription",
            post(IngestHandler::start_transcription),
        )
        .route(
            "/ingest/{file_id}/transcription/{job_id}",
            get(IngestHandler::fetch_transcription).post(IngestHandler::fetch_transcription),
        )
        .route("/ingest/{file_id}/labels", post(IngestHandler::detect_labels))
        .route("/ingest/{file_id}/faces", post(IngestHandler::detect_faces))
        .route("/ingest/{file_id}/shots", post(IngestHandler::plan_shots))
        .route(
            "/ingest/{file_id}/thumbnails",
            post(IngestHandler::plan_thumbnails),
        )
        .route("/ingest/{file_id}/segments", post(IngestHandler::build_segments))
        .route_layer(middleware::from_fn_with_state(auth, ingest_auth_middleware))
        .with_state(ingest_handler)
}
