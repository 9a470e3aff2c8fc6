pub mod compilation_routes;
pub mod file_routes;
pub mod health_routes;
pub mod ingest_routes;
pub mod invitation_routes;
pub mod job_routes;
pub mod project_routes;
pub mod search_routes;
pub mod user_routes;

pub use compilation_routes::*;
pub use file_routes::*;
pub use health_routes::*;
pub use ingest_routes::*;
pub use invitation_routes::*;
pub use job_routes::*;
pub use project_routes::*;
pub use search_routes::*;
pub use user_routes::*;
