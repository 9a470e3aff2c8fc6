pub mod cache;
pub mod container;
pub mod database;
pub mod external_services;
pub mod file_system;
pub mod messaging;
pub mod security;

pub use cache::MokaSearchCache;
pub use container::AppContainer;
pub use database::{DbPool, create_connection_pool};
pub use external_services::InferenceEmbeddingProvider;
pub use file_system::LocalFileStorage;
