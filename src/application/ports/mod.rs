pub mod email_sender;
pub mod embedding_provider;
pub mod file_storage;
pub mod job_queue;
pub mod media_analysis;
pub mod media_transcoder;
pub mod search_cache;

pub use email_sender::EmailSender;
pub use embedding_provider::EmbeddingProvider;
pub use file_storage::FileStorage;
pub use job_queue::JobQueue;
pub use media_analysis::MediaAnalysisProvider;
pub use media_transcoder::MediaTranscoder;
pub use search_cache::SearchCache;
