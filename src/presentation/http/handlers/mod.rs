pub mod compilation_handler;
pub mod file_handler;
pub mod ingest_handler;
pub mod invitation_handler;
pub mod job_handler;
pub mod media_handler;
pub mod project_handler;
pub mod search_handler;
pub mod sse_handler;
pub mod user_handler;

pub use compilation_handler::CompilationHandler;
pub use file_handler::FileHandler;
pub use ingest_handler::IngestHandler;
pub use invitation_handler::InvitationHandler;
pub use job_handler::JobHandler;
pub use media_handler::MediaHandler;
pub use project_handler::ProjectHandler;
pub use search_handler::SearchHandler;
pub use sse_handler::SseHandler;
pub use user_handler::UserHandler;
