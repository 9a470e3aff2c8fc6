pub mod postgres_analysis_repository;
pub mod postgres_compilation_repository;
pub mod postgres_file_repository;
pub mod postgres_invitation_repository;
pub mod postgres_job_repository;
pub mod postgres_moment_repository;
pub mod postgres_project_repository;
pub mod postgres_search_repository;
pub mod postgres_user_repository;

pub use postgres_analysis_repository::PostgresAnalysisRepository;
pub use postgres_compilation_repository::PostgresCompilationRepository;
pub use postgres_file_repository::PostgresFileRepository;
pub use postgres_invitation_repository::PostgresInvitationRepository;
pub use postgres_job_repository::PostgresJobRepository;
pub use postgres_moment_repository::PostgresMomentRepository;
pub use postgres_project_repository::PostgresProjectRepository;
pub use postgres_search_repository::PostgresSearchRepository;
pub use postgres_user_repository::PostgresUserRepository;
