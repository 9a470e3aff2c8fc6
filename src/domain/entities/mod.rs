pub mod ai_analysis;
pub mod compilation;
pub mod file;
pub mod invitation;
pub mod processing_job;
pub mod project;
pub mod search_query;
pub mod user;
pub mod video_moment;

pub use ai_analysis::{AiAnalysis, AnalysisType};
pub use compilation::{Compilation, CompilationMoment, CompilationStatus, TransitionType};
pub use file::File;
pub use invitation::{Invitation, InvitationError, InvitationStatus};
pub use processing_job::{JobResult, ProcessingJob};
pub use project::{Project, ProjectChanges, ProjectStatus};
pub use search_query::{SearchQuery, SearchResult};
pub use user::{User, UserRole, normalize_email};
pub use video_moment::{MomentDraft, VideoMoment};
