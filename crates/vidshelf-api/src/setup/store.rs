use anyhow::Result;
use std::sync::Arc;
use vidshelf_core::Config;
use vidshelf_db::{create_video_store, VideoRecordStore};

pub async fn setup_store(config: &Config) -> Result<Arc<dyn VideoRecordStore>> {
    let store = create_video_store(config).await?;
    tracing::info!(backend = store.backend_name(), "Video record store ready");
    Ok(store)
}
