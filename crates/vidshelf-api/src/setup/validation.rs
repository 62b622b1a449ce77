//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use vidshelf_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if !config.is_production() && config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS allows all origins; set CORS_ORIGINS before deploying");
    }

    if config.host_api_url.starts_with("http://") {
        tracing::warn!(
            host_api_url = %config.host_api_url,
            "Video host API is not using TLS"
        );
    }

    if config.host_upload_chunk_size_bytes > config.max_upload_size_bytes {
        tracing::warn!(
            chunk_size_bytes = config.host_upload_chunk_size_bytes,
            max_upload_size_bytes = config.max_upload_size_bytes,
            "Host chunk size exceeds the upload limit; every upload will go in one chunk"
        );
    }

    Ok(())
}
