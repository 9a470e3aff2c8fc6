pub mod auth;

pub use auth::{AuthState, AuthUser, ingest_auth_middleware, session_auth_middleware};
