use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs::File;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Invalid or expired signature")]
    InvalidSignature,
}

impl From<std::io::Error> for FileStorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FileStorageError::FileNotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                FileStorageError::PermissionDenied(err.to_string())
            }
            _ => FileStorageError::IoError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Byte storage for uploaded footage, addressed by file id.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store_file(&self, file_id: Uuid, data: &[u8]) -> Result<StoredFile, FileStorageError>;

    async fn open_file(&self, file_id: Uuid) -> Result<(File, u64), FileStorageError>;

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError>;

    /// A time-limited URL from which the file can be fetched without a session.
    fn signed_url(&self, file_id: Uuid, ttl_secs: i64) -> SignedUrl;

    fn verify_signed_url(
        &self,
        file_id: Uuid,
        expires: i64,
        signature: &str,
    ) -> Result<(), FileStorageError>;
}
