use crate::{HostError, HostResult, VideoHost, VimeoClient};
use std::sync::Arc;
use vidshelf_core::Config;

/// Create the video host client from configuration
pub fn create_video_host(config: &Config) -> HostResult<Arc<dyn VideoHost>> {
    if !config.host_credentials.is_usable() {
        return Err(HostError::Config(
            "host access token or client id/secret not configured".to_string(),
        ));
    }

    let client = VimeoClient::new(
        config.host_api_url.clone(),
        config.host_credentials.clone(),
        config.host_upload_chunk_size_bytes,
    )?;

    tracing::info!(api_url = %config.host_api_url, "Video host client initialized");
    Ok(Arc::new(client))
}
