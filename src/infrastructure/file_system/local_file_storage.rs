use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use tokio::fs;
use url::form_urlencoded;
use uuid::Uuid;

use crate::application::ports::file_storage::{
    FileStorage, FileStorageError, SignedUrl, StoredFile,
};
use crate::infrastructure::security::Signer;

/// Uploaded footage on local disk, one file per id, served back through
/// signed `/media/{id}` links.
pub struct LocalFileStorage {
    base_path: PathBuf,
    public_base_url: String,
    signer: Signer,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf, public_base_url: &str, signing_secret: &str) -> Self {
        Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            signer: Signer::new(signing_secret),
        }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    fn get_file_path(&self, file_id: Uuid) -> PathBuf {
        self.base_path.join(file_id.to_string())
    }

    fn signature_payload(file_id: Uuid, expires: i64) -> String {
        format!("media:{}:{}", file_id, expires)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(&self, file_id: Uuid, data: &[u8]) -> Result<StoredFile, FileStorageError> {
        self.ensure_directory_exists().await?;

        let file_path = self.get_file_path(file_id);
        fs::write(&file_path, data).await?;

        Ok(StoredFile {
            id: file_id,
            path: file_path.to_string_lossy().to_string(),
            size: data.len() as u64,
        })
    }

    async fn open_file(&self, file_id: Uuid) -> Result<(fs::File, u64), FileStorageError> {
        let file_path = self.get_file_path(file_id);
        let file = fs::File::open(&file_path).await?;
        let size = file.metadata().await?.len();
        Ok((file, size))
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError> {
        match fs::remove_file(self.get_file_path(file_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn signed_url(&self, file_id: Uuid, ttl_secs: i64) -> SignedUrl {
        let expires_at: DateTime<Utc> = Utc::now() + Duration::seconds(ttl_secs);
        let expires = expires_at.timestamp();
        let signature = self.signer.sign(&Self::signature_payload(file_id, expires));
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &signature)
            .finish();

        SignedUrl {
            url: format!("{}/media/{}?{}", self.public_base_url, file_id, query),
            expires_at,
        }
    }

    fn verify_signed_url(
        &self,
        file_id: Uuid,
        expires: i64,
        signature: &str,
    ) -> Result<(), FileStorageError> {
        if expires <= Utc::now().timestamp() {
            return Err(FileStorageError::InvalidSignature);
        }
        if !self
            .signer
            .verify(&Self::signature_payload(file_id, expires), signature)
        {
            return Err(FileStorageError::InvalidSignature);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn storage(dir: &tempfile::TempDir) -> LocalFileStorage {
        LocalFileStorage::new(
            dir.path().join("uploads"),
            "http://localhost:3000/",
            "test-secret",
        )
    }

    fn query_param(url: &str, name: &str) -> String {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn test_store_open_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file_id = Uuid::new_v4();

        let stored = storage.store_file(file_id, b"frames").await.unwrap();
        assert_eq!(stored.size, 6);

        let (mut file, size) = storage.open_file(file_id).await.unwrap();
        assert_eq!(size, 6);
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"frames");

        assert!(storage.delete_file(file_id).await.unwrap());
        assert!(!storage.delete_file(file_id).await.unwrap());
        assert!(matches!(
            storage.open_file(file_id).await,
            Err(FileStorageError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_signed_url_verifies_for_its_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file_id = Uuid::new_v4();

        let signed = storage.signed_url(file_id, 600);
        assert!(signed
            .url
            .starts_with(&format!("http://localhost:3000/media/{}?", file_id)));

        let expires: i64 = query_param(&signed.url, "expires").parse().unwrap();
        let signature = query_param(&signed.url, "signature");

        assert!(storage.verify_signed_url(file_id, expires, &signature).is_ok());
        assert!(storage
            .verify_signed_url(Uuid::new_v4(), expires, &signature)
            .is_err());
        assert!(storage
            .verify_signed_url(file_id, expires + 1, &signature)
            .is_err());
    }

    #[tokio::test]
    async fn test_expired_signed_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file_id = Uuid::new_v4();

        let signed = storage.signed_url(file_id, -10);
        let expires: i64 = query_param(&signed.url, "expires").parse().unwrap();
        let signature = query_param(&signed.url, "signature");

        assert!(matches!(
            storage.verify_signed_url(file_id, expires, &signature),
            Err(FileStorageError::InvalidSignature)
        ));
    }
}
