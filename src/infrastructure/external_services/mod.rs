pub mod email_client;
pub mod inference_client;
pub mod media_analysis_client;
pub mod transcoder_client;

pub use email_client::{HttpEmailSender, LogEmailSender, email_sender_from_config};
pub use inference_client::{EmbeddingsClientConfig, InferenceClient, InferenceEmbeddingProvider};
pub use media_analysis_client::HttpMediaAnalysisProvider;
pub use transcoder_client::HttpMediaTranscoder;
