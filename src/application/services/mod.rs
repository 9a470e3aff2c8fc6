pub mod access_control;
pub mod compilation_service;
pub mod embedding_service;
pub mod ingestion_service;
pub mod search_service;

pub use access_control::AccessControl;
pub use compilation_service::CompilationService;
pub use embedding_service::EmbeddingService;
pub use ingestion_service::IngestionService;
pub use search_service::SearchService;
