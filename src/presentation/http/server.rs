use axum::Router;
use axum::http::HeaderValue;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::infrastructure::cache::MokaSearchCache;
use crate::infrastructure::messaging::BackgroundProcessor;
use crate::presentation::http::{
    handlers::{
        CompilationHandler, FileHandler, IngestHandler, InvitationHandler, JobHandler,
        MediaHandler, ProjectHandler, SearchHandler, SseHandler, UserHandler,
    },
    middleware::AuthState,
    routes::{
        compilation_routes, file_routes, health_routes, ingest_routes, invitation_routes,
        job_routes, project_routes, search_routes, user_routes,
    },
};

/// Every handler the HTTP surface dispatches to.
pub struct Handlers {
    pub user: Arc<UserHandler>,
    pub project: Arc<ProjectHandler>,
    pub file: Arc<FileHandler>,
    pub media: Arc<MediaHandler>,
    pub job: Arc<JobHandler>,
    pub sse: Arc<SseHandler>,
    pub search: Arc<SearchHandler>,
    pub compilation: Arc<CompilationHandler>,
    pub invitation: Arc<InvitationHandler>,
    pub ingest: Arc<IngestHandler>,
}

pub struct HttpServer {
    handlers: Handlers,
    auth: Arc<AuthState>,
    background_processor: Arc<BackgroundProcessor>,
    search_cache: Arc<MokaSearchCache>,
    cache_sweep_interval: Duration,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(
        handlers: Handlers,
        auth: Arc<AuthState>,
        background_processor: Arc<BackgroundProcessor>,
        search_cache: Arc<MokaSearchCache>,
        cache_sweep_interval: Duration,
        config: ServerConfig,
    ) -> Self {
        Self {
            handlers,
            auth,
            background_processor,
            search_cache,
            cache_sweep_interval,
            config,
        }
    }

    fn cors(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        let allow_origin = if origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }

    pub fn router(&self) -> Router {
        let handlers = &self.handlers;
        let auth = &self.auth;

        Router::new()
            .merge(health_routes())
            .merge(user_routes(handlers.user.clone(), auth.clone()))
            .merge(project_routes(handlers.project.clone(), auth.clone()))
            .merge(file_routes(
                handlers.file.clone(),
                handlers.media.clone(),
                auth.clone(),
            ))
            .merge(job_routes(
                handlers.job.clone(),
                handlers.sse.clone(),
                auth.clone(),
            ))
            .merge(search_routes(handlers.search.clone(), auth.clone()))
            .merge(compilation_routes(handlers.compilation.clone(), auth.clone()))
            .merge(invitation_routes(handlers.invitation.clone(), auth.clone()))
            .merge(ingest_routes(handlers.ingest.clone(), auth.clone()))
            .layer(self.cors())
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                method = %request.method(),
                                uri = %request.uri(),
                                "Received request"
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                status = %response.status(),
                                latency_ms = latency.as_millis() as u64,
                                "Response"
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass, latency: Duration, _span: &tracing::Span| {
                            tracing::error!(
                                error = %error,
                                latency_ms = latency.as_millis() as u64,
                                "Request failed"
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let background_processor = self.background_processor.clone();
        tokio::spawn(async move {
            background_processor.start().await;
        });
        let _sweeper = self.search_cache.spawn_sweeper(self.cache_sweep_interval);

        let app = self.router();

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Memory Finder listening");
        axum::serve(listener, app).await?;

        Ok(())
    }
}
