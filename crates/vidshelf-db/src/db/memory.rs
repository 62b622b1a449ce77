use async_trait::async_trait;
use tokio::sync::RwLock;
use vidshelf_core::{AppError, VideoRecord};

use super::traits::VideoRecordStore;

/// Process-local video record repository.
///
/// Records are lost on restart. Used for `memory://` connection strings and
/// as the store in tests.
#[derive(Default)]
pub struct MemoryVideoRepository {
    records: RwLock<Vec<VideoRecord>>,
}

impl MemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VideoRecordStore for MemoryVideoRepository {
    async fn list(&self) -> Result<Vec<VideoRecord>, AppError> {
        let mut videos = self.records.read().await.clone();
        videos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.video_id.cmp(&a.video_id))
        });
        Ok(videos)
    }

    async fn create(&self, record: VideoRecord) -> Result<VideoRecord, AppError> {
        // Check and insert under one write lock
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.video_id == record.video_id) {
            return Err(AppError::DuplicateKey(record.video_id));
        }
        records.push(record.clone());
        tracing::debug!(video_id = %record.video_id, "Video record stored in memory");
        Ok(record)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
