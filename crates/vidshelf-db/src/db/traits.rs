//! Record store abstraction trait

use async_trait::async_trait;
use vidshelf_core::{AppError, VideoRecord};

/// Video record store
///
/// Implementations must enforce uniqueness of `video_id` atomically per
/// `create`, so concurrent uploads need no in-process locking.
#[async_trait]
pub trait VideoRecordStore: Send + Sync {
    /// All records ordered by `created_at` descending.
    async fn list(&self) -> Result<Vec<VideoRecord>, AppError>;

    /// Persist a new record and return it as stored.
    ///
    /// Fails with `AppError::DuplicateKey` if `video_id` already exists; the
    /// existing record is left untouched.
    async fn create(&self, record: VideoRecord) -> Result<VideoRecord, AppError>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> Result<(), AppError>;

    /// Backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
