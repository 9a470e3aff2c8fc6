pub mod compilation_dto;
pub mod file_dto;
pub mod ingest_dto;
pub mod invitation_dto;
pub mod job_dto;
pub mod moment_dto;
pub mod project_dto;
pub mod response_dto;
pub mod search_dto;
pub mod user_dto;

pub use compilation_dto::*;
pub use file_dto::*;
pub use ingest_dto::*;
pub use invitation_dto::*;
pub use job_dto::*;
pub use moment_dto::*;
pub use project_dto::*;
pub use response_dto::*;
pub use search_dto::*;
pub use user_dto::*;
