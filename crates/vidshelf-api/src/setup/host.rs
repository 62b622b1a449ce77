use anyhow::{Context, Result};
use std::sync::Arc;
use vidshelf_core::Config;
use vidshelf_host::{create_video_host, VideoHost};

pub fn setup_host(config: &Config) -> Result<Arc<dyn VideoHost>> {
    let host = create_video_host(config).context("Failed to create video host client")?;
    tracing::info!(
        chunk_size_mb = config.host_upload_chunk_size_bytes / 1024 / 1024,
        "Video host client ready"
    );
    Ok(host)
}
