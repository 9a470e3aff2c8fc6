pub mod analysis_repository;
pub mod compilation_repository;
pub mod error;
pub mod file_repository;
pub mod invitation_repository;
pub mod job_repository;
pub mod moment_repository;
pub mod project_repository;
pub mod search_repository;
pub mod user_repository;

pub use analysis_repository::AnalysisRepository;
pub use compilation_repository::CompilationRepository;
pub use error::RepositoryError;
pub use file_repository::FileRepository;
pub use invitation_repository::InvitationRepository;
pub use job_repository::JobRepository;
pub use moment_repository::{MomentFilter, MomentRepository, ScoredMoment};
pub use project_repository::ProjectRepository;
pub use search_repository::SearchRepository;
pub use user_repository::UserRepository;
