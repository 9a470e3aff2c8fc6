use chrono::Utc;
use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signatures over short text payloads, hex encoded.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            mac: <HmacSha256 as KeyInit>::new(&block_key(secret.into().as_bytes())),
        }
    }

    pub fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }

    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        constant_time_eq(self.sign(payload).as_bytes(), signature.as_bytes())
    }
}

/// Zero-padded block key; secrets longer than a block are hashed first.
fn block_key(secret: &[u8]) -> Key<HmacSha256> {
    let mut key = Key::<HmacSha256>::default();
    if secret.len() > key.len() {
        let digest = Sha256::digest(secret);
        key[..digest.len()].copy_from_slice(&digest);
    } else {
        key[..secret.len()].copy_from_slice(secret);
    }
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Malformed session token")]
    Malformed,
    #[error("Invalid session signature")]
    BadSignature,
    #[error("Session expired")]
    Expired,
}

/// Session tokens of the form `{user_id}.{expires_unix}.{signature}`.
///
/// Tokens are minted by the account service that shares the session secret;
/// this service only verifies them.
#[derive(Clone)]
pub struct SessionTokens {
    signer: Signer,
}

impl SessionTokens {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            signer: Signer::new(secret),
        }
    }

    pub fn issue(&self, user_id: Uuid, ttl_secs: i64) -> String {
        let payload = format!("{}.{}", user_id, Utc::now().timestamp() + ttl_secs);
        let signature = self.signer.sign(&payload);
        format!("{}.{}", payload, signature)
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, SessionError> {
        let mut parts = token.trim().splitn(3, '.');
        let (Some(user), Some(expires), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(SessionError::Malformed);
        };

        let user_id = Uuid::parse_str(user).map_err(|_| SessionError::Malformed)?;
        let expires: i64 = expires.parse().map_err(|_| SessionError::Malformed)?;

        if !self.signer.verify(&format!("{}.{}", user, expires), signature) {
            return Err(SessionError::BadSignature);
        }
        if expires <= Utc::now().timestamp() {
            return Err(SessionError::Expired);
        }
        Ok(user_id)
    }
}
