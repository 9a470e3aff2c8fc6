use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::{FileHandler, MediaHandler};
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn file_routes(
    file_handler: Arc<FileHandler>,
    media_handler: Arc<MediaHandler>,
    auth: Arc<AuthState>,
) -> Router {
    // Signed URLs are the credential for media; no session needed.
    let media = Router::new()
        .route("/media/{file_id}", get(MediaHandler::stream_media))
        .with_state(media_handler);

    Router::new()
        // Upload size is capped by the server-wide body limit instead.
        .route(
            "/upload",
            post(FileHandler::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/files/{file_id}",
            get(FileHandler::get_file).delete(FileHandler::delete_file),
        )
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware))
        .with_state(file_handler)
        .merge(media)
}
