use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of an uploaded video. Two uploads with the same hash
/// inside one project are treated as the same footage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHash(String);

impl FileHash {
    pub fn parse(hash: &str) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err(format!(
                "expected a 64 character SHA-256 digest, got {} characters",
                hash.len()
            ));
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("digest must be hexadecimal".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn of(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
