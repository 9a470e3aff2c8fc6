use std::{sync::Arc, time::Duration};

use crate::{
    application::{
        ports::{
            EmailSender, EmbeddingProvider, FileStorage, JobQueue, MediaAnalysisProvider,
            MediaTranscoder, SearchCache,
        },
        services::{
            AccessControl, CompilationService, EmbeddingService, IngestionService, SearchService,
            embedding_service::EmbeddingSettings,
        },
        use_cases::{
            CancelJobUseCase, CreateCompilationUseCase, CreateProjectUseCase, DeleteFileUseCase,
            DeleteProjectUseCase, GetCompilationUseCase, GetFileUseCase, GetJobStatusUseCase,
            GetProjectUseCase, ListFilesUseCase, ListMomentsUseCase, ListProjectsUseCase,
            LookupUserUseCase, QueueProcessingJobUseCase, RespondToInvitationUseCase,
            SearchMomentsUseCase, ShareProjectUseCase, TrackSearchClickUseCase,
            UpdateProjectUseCase, UploadFileUseCase,
        },
    },
    config::Config,
    domain::repositories::{
        AnalysisRepository, CompilationRepository, FileRepository, InvitationRepository,
        JobRepository, MomentRepository, ProjectRepository, SearchRepository, UserRepository,
    },
    infrastructure::{
        cache::MokaSearchCache,
        database::{
            DbPool, create_connection_pool,
            repositories::{
                PostgresAnalysisRepository, PostgresCompilationRepository,
                PostgresFileRepository, PostgresInvitationRepository, PostgresJobRepository,
                PostgresMomentRepository, PostgresProjectRepository, PostgresSearchRepository,
                PostgresUserRepository,
            },
            run_migrations,
        },
        external_services::{
            EmbeddingsClientConfig, HttpMediaAnalysisProvider, HttpMediaTranscoder,
            InferenceEmbeddingProvider, email_sender_from_config,
        },
        file_system::LocalFileStorage,
        messaging::{BackgroundProcessor, MpscJobQueue},
        security::SessionTokens,
    },
    presentation::http::{
        Handlers, HttpServer,
        handlers::{
            CompilationHandler, FileHandler, IngestHandler, InvitationHandler, JobHandler,
            MediaHandler, ProjectHandler, SearchHandler, SseHandler, UserHandler,
        },
        middleware::AuthState,
    },
};

fn embedding_provider(
    config: Option<EmbeddingsClientConfig>,
) -> Result<Option<Arc<dyn EmbeddingProvider>>, reqwest::Error> {
    match config {
        Some(config) => {
            tracing::info!(url = %config.service_url, model = %config.model, "Embedding provider configured");
            let provider: Arc<dyn EmbeddingProvider> =
                Arc::new(InferenceEmbeddingProvider::from_config(config)?);
            Ok(Some(provider))
        }
        None => Ok(None),
    }
}

/// Wires the whole service together from configuration.
pub struct AppContainer {
    config: Config,
    pub db_pool: DbPool,

    // Repositories
    pub file_repository: Arc<dyn FileRepository>,
    pub job_repository: Arc<dyn JobRepository>,

    // External Services
    pub file_storage: Arc<dyn FileStorage>,
    pub search_cache: Arc<MokaSearchCache>,

    // Job Queue and Background Processing
    pub job_queue: Arc<dyn JobQueue>,
    pub background_processor: Arc<BackgroundProcessor>,

    // Application Services
    pub embedding_service: Arc<EmbeddingService>,
    pub search_service: Arc<SearchService>,
    pub compilation_service: Arc<CompilationService>,
    pub ingestion_service: Arc<IngestionService>,

    pub auth: Arc<AuthState>,
    handlers: Handlers,
}

impl AppContainer {
    pub async fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        if config.database.url.is_empty() {
            return Err("DATABASE_URL must be set".into());
        }

        let db_pool = create_connection_pool(&config.database)?;
        run_migrations(&db_pool).map_err(|e| format!("Failed to run database migrations: {}", e))?;

        // Create repositories
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(db_pool.clone()));
        let project_repository: Arc<dyn ProjectRepository> =
            Arc::new(PostgresProjectRepository::new(db_pool.clone()));
        let invitation_repository: Arc<dyn InvitationRepository> =
            Arc::new(PostgresInvitationRepository::new(db_pool.clone()));
        let file_repository: Arc<dyn FileRepository> =
            Arc::new(PostgresFileRepository::new(db_pool.clone()));
        let job_repository: Arc<dyn JobRepository> =
            Arc::new(PostgresJobRepository::new(db_pool.clone()));
        let moment_repository: Arc<dyn MomentRepository> =
            Arc::new(PostgresMomentRepository::new(db_pool.clone()));
        let analysis_repository: Arc<dyn AnalysisRepository> =
            Arc::new(PostgresAnalysisRepository::new(db_pool.clone()));
        let search_repository: Arc<dyn SearchRepository> =
            Arc::new(PostgresSearchRepository::new(db_pool.clone()));
        let compilation_repository: Arc<dyn CompilationRepository> =
            Arc::new(PostgresCompilationRepository::new(db_pool.clone()));

        // Create external services
        let local_storage = LocalFileStorage::new(
            config.storage.upload_dir.clone(),
            &config.server.public_base_url,
            &config.storage.signing_secret,
        );
        local_storage.ensure_directory_exists().await?;
        let file_storage: Arc<dyn FileStorage> = Arc::new(local_storage);

        let primary = embedding_provider(EmbeddingsClientConfig::primary(&config.embeddings))?;
        let secondary = embedding_provider(EmbeddingsClientConfig::secondary(&config.embeddings))?;
        if primary.is_none() && secondary.is_none() {
            tracing::warn!("No embedding service configured; every embedding will use the fallback policy");
        }

        let analysis_provider: Option<Arc<dyn MediaAnalysisProvider>> =
            match HttpMediaAnalysisProvider::from_config(&config.services)? {
                Some(provider) => Some(Arc::new(provider)),
                None => {
                    tracing::warn!("ANALYSIS_SERVICE_URL not set; moments will be built from shots only");
                    None
                }
            };
        let transcoder: Option<Arc<dyn MediaTranscoder>> =
            match HttpMediaTranscoder::from_config(&config.services)? {
                Some(transcoder) => Some(Arc::new(transcoder)),
                None => None,
            };
        let email_sender: Arc<dyn EmailSender> = email_sender_from_config(&config.services)?;

        let search_cache = Arc::new(MokaSearchCache::from_config(&config.search));
        let search_cache_port: Arc<dyn SearchCache> = search_cache.clone();

        // Create application services
        let access_control = Arc::new(AccessControl::new(
            project_repository.clone(),
            invitation_repository.clone(),
        ));
        let embedding_service = Arc::new(EmbeddingService::new(
            primary,
            secondary,
            EmbeddingSettings::from(&config.embeddings),
        ));
        let search_service = Arc::new(SearchService::new(
            embedding_service.clone(),
            moment_repository.clone(),
            search_repository.clone(),
            search_cache_port.clone(),
            config.search.clone(),
        ));
        let compilation_service = Arc::new(CompilationService::new(
            moment_repository.clone(),
            compilation_repository.clone(),
            file_storage.clone(),
            transcoder,
            config.compilation.clone(),
            config.storage.url_ttl_secs,
        ));
        let ingestion_service = Arc::new(IngestionService::new(
            file_repository.clone(),
            analysis_repository.clone(),
            moment_repository.clone(),
            analysis_provider,
            file_storage.clone(),
            embedding_service.clone(),
            search_cache_port.clone(),
            config.ingestion.clone(),
            config.storage.url_ttl_secs,
        ));

        // Create job queue and background processor
        let (job_queue, job_receiver) = MpscJobQueue::create_pair();
        let job_queue: Arc<dyn JobQueue> = Arc::new(job_queue);
        let background_processor = Arc::new(
            BackgroundProcessor::new(
                Arc::new(job_receiver),
                job_repository.clone(),
                ingestion_service.clone(),
            )
            .with_worker_count(config.ingestion.worker_count),
        );

        // Create use cases
        let lookup_user_use_case = Arc::new(LookupUserUseCase::new(user_repository));
        let create_project_use_case = Arc::new(CreateProjectUseCase::new(project_repository.clone()));
        let list_projects_use_case = Arc::new(ListProjectsUseCase::new(project_repository.clone()));
        let get_project_use_case = Arc::new(GetProjectUseCase::new(access_control.clone()));
        let update_project_use_case = Arc::new(UpdateProjectUseCase::new(
            access_control.clone(),
            project_repository.clone(),
        ));
        let delete_project_use_case = Arc::new(DeleteProjectUseCase::new(
            access_control.clone(),
            project_repository.clone(),
            file_repository.clone(),
            file_storage.clone(),
        ));
        let share_project_use_case = Arc::new(ShareProjectUseCase::new(
            access_control.clone(),
            invitation_repository.clone(),
            email_sender,
            config.server.public_base_url.clone(),
            config.invitations.ttl_days,
        ));
        let respond_to_invitation_use_case = Arc::new(RespondToInvitationUseCase::new(
            invitation_repository,
            project_repository,
            config.invitations.ttl_days,
        ));

        let queue_job_use_case = Arc::new(QueueProcessingJobUseCase::new(
            access_control.clone(),
            job_repository.clone(),
            job_queue.clone(),
            file_repository.clone(),
        ));
        let get_job_status_use_case = Arc::new(GetJobStatusUseCase::new(
            access_control.clone(),
            job_repository.clone(),
            file_repository.clone(),
        ));
        let cancel_job_use_case = Arc::new(CancelJobUseCase::new(
            access_control.clone(),
            job_repository.clone(),
            file_repository.clone(),
            job_queue.clone(),
        ));

        let upload_file_use_case = Arc::new(UploadFileUseCase::new(
            access_control.clone(),
            file_repository.clone(),
            file_storage.clone(),
            queue_job_use_case.clone(),
        ));
        let get_file_use_case = Arc::new(GetFileUseCase::new(
            access_control.clone(),
            file_repository.clone(),
            job_repository.clone(),
            file_storage.clone(),
            config.storage.url_ttl_secs,
        ));
        let list_files_use_case = Arc::new(ListFilesUseCase::new(
            access_control.clone(),
            file_repository.clone(),
        ));
        let delete_file_use_case = Arc::new(DeleteFileUseCase::new(
            access_control.clone(),
            file_repository.clone(),
            file_storage.clone(),
            search_cache_port.clone(),
        ));
        let list_moments_use_case = Arc::new(ListMomentsUseCase::new(
            access_control.clone(),
            moment_repository,
        ));

        let search_moments_use_case = Arc::new(SearchMomentsUseCase::new(
            access_control.clone(),
            search_service.clone(),
        ));
        let track_click_use_case = Arc::new(TrackSearchClickUseCase::new(
            access_control.clone(),
            search_repository,
        ));

        let create_compilation_use_case = Arc::new(CreateCompilationUseCase::new(
            access_control.clone(),
            compilation_service.clone(),
        ));
        let get_compilation_use_case = Arc::new(GetCompilationUseCase::new(
            access_control,
            compilation_repository,
            compilation_service.clone(),
        ));

        // Create HTTP handlers
        let handlers = Handlers {
            user: Arc::new(UserHandler::new(lookup_user_use_case)),
            project: Arc::new(ProjectHandler::new(
                create_project_use_case,
                list_projects_use_case,
                get_project_use_case,
                update_project_use_case,
                delete_project_use_case,
                list_files_use_case,
                list_moments_use_case,
                share_project_use_case,
            )),
            file: Arc::new(FileHandler::new(
                upload_file_use_case,
                get_file_use_case,
                delete_file_use_case,
            )),
            media: Arc::new(MediaHandler::new(file_repository.clone(), file_storage.clone())),
            job: Arc::new(JobHandler::new(
                queue_job_use_case,
                get_job_status_use_case.clone(),
                cancel_job_use_case,
            )),
            sse: Arc::new(SseHandler::new(get_job_status_use_case)),
            search: Arc::new(SearchHandler::new(search_moments_use_case, track_click_use_case)),
            compilation: Arc::new(CompilationHandler::new(
                create_compilation_use_case,
                get_compilation_use_case,
            )),
            invitation: Arc::new(InvitationHandler::new(respond_to_invitation_use_case)),
            ingest: Arc::new(IngestHandler::new(ingestion_service.clone())),
        };

        let auth = Arc::new(AuthState {
            sessions: SessionTokens::new(config.auth.session_secret.clone()),
            ingest_keys: config.ingestion.api_keys.clone(),
        });
        if auth.ingest_keys.is_empty() {
            tracing::warn!("INGEST_API_KEYS not set; /ingest endpoints will reject every request");
        }

        Ok(Self {
            config,
            db_pool,
            file_repository,
            job_repository,
            file_storage,
            search_cache,
            job_queue,
            background_processor,
            embedding_service,
            search_service,
            compilation_service,
            ingestion_service,
            auth,
            handlers,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_server(self) -> HttpServer {
        HttpServer::new(
            self.handlers,
            self.auth,
            self.background_processor,
            self.search_cache,
            Duration::from_secs(self.config.search.cache_sweep_secs),
            self.config.server,
        )
    }
}
