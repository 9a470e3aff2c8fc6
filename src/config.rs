use std::env;
use std::path::PathBuf;

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::domain::entities::TransitionType;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_opt(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn env_list(var: &str) -> Vec<String> {
    env::var(var)
        .map(|items| {
            items
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn secret_or_random(var: &str) -> String {
    match env_opt(var) {
        Some(secret) => secret,
        None => {
            tracing::warn!(
                "{} is not set; using a random secret that changes on every restart",
                var
            );
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(48)
                .map(char::from)
                .collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub embeddings: EmbeddingsConfig,
    pub search: SearchConfig,
    pub compilation: CompilationConfig,
    pub ingestion: IngestionConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub services: ServicesConfig,
    pub invitations: InvitationConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Absolute origin used when building links handed to other services.
    pub public_base_url: String,
    pub body_limit_bytes: usize,
    /// Allowed browser origins; empty allows any origin.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingApiFormat {
    /// `{"text": ...}` in, `{"embeddings": [[...]]}` out.
    Inference,
    /// `{"model": ..., "input": ...}` in, `{"data": [{"embedding": [...]}]}` out.
    OpenAi,
}

impl std::str::FromStr for EmbeddingApiFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "inference" => Ok(EmbeddingApiFormat::Inference),
            "openai" => Ok(EmbeddingApiFormat::OpenAi),
            other => Err(format!("expected 'inference' or 'openai', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute a random vector and log a warning.
    Random,
    /// Surface the provider error to the caller.
    Error,
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "random" => Ok(FallbackPolicy::Random),
            "error" => Ok(FallbackPolicy::Error),
            other => Err(format!("expected 'random' or 'error', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingsConfig {
    pub service_url: Option<String>,
    pub api_format: EmbeddingApiFormat,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    pub max_chars: usize,
    pub fallback: FallbackPolicy,
    pub secondary_url: Option<String>,
    pub secondary_api_format: EmbeddingApiFormat,
    pub secondary_api_key: Option<String>,
    pub secondary_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_limit: i64,
    pub max_limit: i64,
    pub default_threshold: f64,
    pub cache_ttl_secs: u64,
    pub cache_sweep_secs: u64,
    pub cache_max_entries: u64,
}

#[derive(Debug, Clone)]
pub struct CompilationConfig {
    pub default_max_duration_secs: f64,
    pub fill_ratio: f64,
    pub transition: TransitionType,
    pub transition_duration_secs: f64,
}

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub shot_interval_secs: f64,
    pub thumbnail_interval_secs: f64,
    pub worker_count: usize,
    pub api_keys: Vec<String>,
    pub transcription_poll_secs: u64,
    pub transcription_max_polls: u32,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub signing_secret: String,
    pub url_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
}

#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub analysis_url: Option<String>,
    pub analysis_api_key: Option<String>,
    pub transcoder_url: Option<String>,
    pub transcoder_api_key: Option<String>,
    pub email_url: Option<String>,
    pub email_api_key: Option<String>,
    pub email_from: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct InvitationConfig {
    pub ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = parse_env_or("PORT", 3000);
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let public_base_url = env_opt("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let api_format = parse_env_or("EMBEDDING_API_FORMAT", EmbeddingApiFormat::Inference);
        let default_model = match api_format {
            EmbeddingApiFormat::OpenAi => "text-embedding-3-small",
            EmbeddingApiFormat::Inference => "default",
        };

        Self {
            server: ServerConfig {
                host,
                port,
                public_base_url,
                body_limit_bytes: parse_env_or("MAX_UPLOAD_BYTES", 2 * 1024 * 1024 * 1024),
                cors_origins: env_list("CORS_ORIGINS"),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_default(),
                pool_max_size: parse_env_or("DB_POOL_MAX", 10),
            },
            embeddings: EmbeddingsConfig {
                service_url: env_opt("EMBEDDINGS_SERVICE_URL"),
                api_format,
                api_key: env_opt("EMBEDDING_API_KEY"),
                model: env::var("EMBEDDING_MODEL").unwrap_or_else(|_| default_model.to_string()),
                dimension: parse_env_or("EMBEDDING_DIMENSION", 1536),
                max_chars: parse_env_or("EMBEDDING_MAX_CHARS", 8000),
                fallback: parse_env_or("EMBEDDING_FALLBACK", FallbackPolicy::Random),
                secondary_url: env_opt("EMBEDDING_SECONDARY_URL"),
                secondary_api_format: parse_env_or(
                    "EMBEDDING_SECONDARY_API_FORMAT",
                    EmbeddingApiFormat::Inference,
                ),
                secondary_api_key: env_opt("EMBEDDING_SECONDARY_API_KEY"),
                secondary_model: env::var("EMBEDDING_SECONDARY_MODEL")
                    .unwrap_or_else(|_| "default".to_string()),
                timeout_secs: parse_env_or("EMBEDDING_TIMEOUT_SECS", 30),
                max_retries: parse_env_or("EMBEDDING_MAX_RETRIES", 0),
                backoff_factor: parse_env_or("EMBEDDING_BACKOFF_FACTOR", 1.5),
            },
            search: SearchConfig {
                default_limit: parse_env_or("SEARCH_DEFAULT_LIMIT", 10),
                max_limit: parse_env_or("SEARCH_MAX_LIMIT", 100),
                default_threshold: parse_env_or("SEARCH_DEFAULT_THRESHOLD", 0.3),
                cache_ttl_secs: parse_env_or("SEARCH_CACHE_TTL_SECS", 300),
                cache_sweep_secs: parse_env_or("SEARCH_CACHE_SWEEP_SECS", 60),
                cache_max_entries: parse_env_or("SEARCH_CACHE_MAX_ENTRIES", 10_000),
            },
            compilation: CompilationConfig {
                default_max_duration_secs: parse_env_or("COMPILATION_MAX_DURATION_SECS", 180.0),
                fill_ratio: parse_env_or("COMPILATION_FILL_RATIO", 0.8),
                transition: parse_env_or("COMPILATION_TRANSITION", TransitionType::Crossfade),
                transition_duration_secs: parse_env_or("COMPILATION_TRANSITION_SECS", 0.5),
            },
            ingestion: IngestionConfig {
                shot_interval_secs: parse_env_or("SHOT_INTERVAL_SECS", 10.0),
                thumbnail_interval_secs: parse_env_or("THUMBNAIL_INTERVAL_SECS", 5.0),
                worker_count: parse_env_or("WORKER_COUNT", 2),
                api_keys: env_list("INGEST_API_KEYS"),
                transcription_poll_secs: parse_env_or("TRANSCRIPTION_POLL_SECS", 10),
                transcription_max_polls: parse_env_or("TRANSCRIPTION_MAX_POLLS", 90),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(
                    env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
                ),
                signing_secret: secret_or_random("STORAGE_SIGNING_SECRET"),
                url_ttl_secs: parse_env_or("SIGNED_URL_TTL_SECS", 3600),
            },
            auth: AuthConfig {
                session_secret: secret_or_random("SESSION_SECRET"),
            },
            services: ServicesConfig {
                analysis_url: env_opt("ANALYSIS_SERVICE_URL"),
                analysis_api_key: env_opt("ANALYSIS_API_KEY"),
                transcoder_url: env_opt("TRANSCODER_URL"),
                transcoder_api_key: env_opt("TRANSCODER_API_KEY"),
                email_url: env_opt("EMAIL_SERVICE_URL"),
                email_api_key: env_opt("EMAIL_API_KEY"),
                email_from: env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "Memory Finder <no-reply@memoryfinder.app>".to_string()),
                timeout_secs: parse_env_or("SERVICE_TIMEOUT_SECS", 60),
            },
            invitations: InvitationConfig {
                ttl_days: parse_env_or("INVITATION_TTL_DAYS", 30),
            },
        }
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with fixed secrets, for tests that never touch the environment.
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                public_base_url: "http://localhost:3000".to_string(),
                body_limit_bytes: 1024 * 1024,
                cors_origins: Vec::new(),
            },
            database: DatabaseConfig {
                url: String::new(),
                pool_max_size: 2,
            },
            embeddings: EmbeddingsConfig {
                service_url: None,
                api_format: EmbeddingApiFormat::Inference,
                api_key: None,
                model: "default".to_string(),
                dimension: 8,
                max_chars: 8000,
                fallback: FallbackPolicy::Random,
                secondary_url: None,
                secondary_api_format: EmbeddingApiFormat::Inference,
                secondary_api_key: None,
                secondary_model: "default".to_string(),
                timeout_secs: 5,
                max_retries: 0,
                backoff_factor: 1.5,
            },
            search: SearchConfig {
                default_limit: 10,
                max_limit: 100,
                default_threshold: 0.3,
                cache_ttl_secs: 300,
                cache_sweep_secs: 60,
                cache_max_entries: 1000,
            },
            compilation: CompilationConfig {
                default_max_duration_secs: 180.0,
                fill_ratio: 0.8,
                transition: TransitionType::Crossfade,
                transition_duration_secs: 0.5,
            },
            ingestion: IngestionConfig {
                shot_interval_secs: 10.0,
                thumbnail_interval_secs: 5.0,
                worker_count: 1,
                api_keys: vec!["ingest-test-key".to_string()],
                transcription_poll_secs: 0,
                transcription_max_polls: 3,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("./uploads"),
                signing_secret: "storage-test-secret".to_string(),
                url_ttl_secs: 3600,
            },
            auth: AuthConfig {
                session_secret: "session-test-secret".to_string(),
            },
            services: ServicesConfig {
                analysis_url: None,
                analysis_api_key: None,
                transcoder_url: None,
                transcoder_api_key: None,
                email_url: None,
                email_api_key: None,
                email_from: "test@memoryfinder.app".to_string(),
                timeout_secs: 5,
            },
            invitations: InvitationConfig { ttl_days: 30 },
        }
    }
}
