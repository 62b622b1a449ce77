//! Configuration module
//!
//! Environment-style configuration for the HTTP server, the record store, and
//! the external video host client. A `.env` file is loaded when present.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST_API_URL: &str = "https://api.vimeo.com";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const MAX_UPLOAD_SIZE_MB: usize = 2048;
const HOST_UPLOAD_CHUNK_SIZE_MB: usize = 8;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_TIMEOUT_SECS: u64 = 30;

/// Parse a size in megabytes and convert it to bytes.
fn megabytes(key: &str, value: Option<String>, default: usize) -> Result<usize, anyhow::Error> {
    value
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

/// Where video records are persisted, derived from the connection string scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let scheme = connection_string.split("://").next()?.to_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(StoreBackend::Postgres),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Credentials for the external video host API
#[derive(Clone, Default)]
pub struct HostCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for HostCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl HostCredentials {
    /// Whether a token or a full client id/secret pair is available.
    pub fn is_usable(&self) -> bool {
        self.access_token.is_some() || (self.client_id.is_some() && self.client_secret.is_some())
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_connection_string: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub host_api_url: String,
    pub host_credentials: HostCredentials,
    pub host_upload_chunk_size_bytes: usize,
    pub upload_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(k))
                .find(|v| !v.is_empty())
        };

        let database_connection_string = first(&["DATABASE_CONNECTION_STRING", "DATABASE_URL"])
            .ok_or_else(|| {
                anyhow::anyhow!("DATABASE_CONNECTION_STRING or DATABASE_URL must be set")
            })?;

        let host_credentials = HostCredentials {
            client_id: first(&["HOST_CLIENT_ID", "VIMEO_CLIENT_ID"]),
            client_secret: first(&["HOST_CLIENT_SECRET", "VIMEO_CLIENT_SECRET"]),
            access_token: first(&["HOST_ACCESS_TOKEN", "VIMEO_ACCESS_TOKEN"]),
        };

        let config = Config {
            server_port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment: first(&["ENVIRONMENT", "APP_ENV"])
                .unwrap_or_else(|| "development".to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_connection_string,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DB_MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DB_TIMEOUT_SECS),
            host_api_url: lookup("HOST_API_URL")
                .unwrap_or_else(|| DEFAULT_HOST_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            host_credentials,
            host_upload_chunk_size_bytes: megabytes(
                "HOST_UPLOAD_CHUNK_SIZE_MB",
                lookup("HOST_UPLOAD_CHUNK_SIZE_MB"),
                HOST_UPLOAD_CHUNK_SIZE_MB,
            )?,
            upload_dir: PathBuf::from(
                lookup("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            max_upload_size_bytes: megabytes(
                "MAX_UPLOAD_SIZE_MB",
                lookup("MAX_UPLOAD_SIZE_MB"),
                MAX_UPLOAD_SIZE_MB,
            )?,
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
        };

        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn store_backend(&self) -> Option<StoreBackend> {
        StoreBackend::from_connection_string(&self.database_connection_string)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_backend().is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_CONNECTION_STRING must start with postgres://, postgresql:// or memory://"
            ));
        }
        if !self.host_credentials.is_usable() {
            return Err(anyhow::anyhow!(
                "HOST_ACCESS_TOKEN, or HOST_CLIENT_ID together with HOST_CLIENT_SECRET, must be set"
            ));
        }
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("Database max connections cannot be 0"));
        }
        if self.db_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("Database timeout cannot be 0"));
        }
        if self.host_upload_chunk_size_bytes == 0 {
            return Err(anyhow::anyhow!("HOST_UPLOAD_CHUNK_SIZE_MB cannot be 0"));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production. \
                Set specific allowed origins via CORS_ORIGINS."
            ));
        }
        Ok(())
    }
}
