use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::InvitationHandler;
use crate::presentation::http::middleware::{AuthState, session_auth_middleware};

pub fn invitation_routes(
    invitation_handler: Arc<InvitationHandler>,
    auth: Arc<AuthState>,
) -> Router {
    let respond = Router::new()
        .route(
            "/invitations/{token}/accept",
            post(InvitationHandler::accept_invitation),
        )
        .route(
            "/invitations/{token}/decline",
            post(InvitationHandler::decline_invitation),
        )
        .route_layer(middleware::from_fn_with_state(auth, session_auth_middleware));

    Router::new()
        .route("/invitations/{token}", get(InvitationHandler::get_invitation))
        .merge(respond)
        .with_state(invitation_handler)
}
