//! Video host abstraction trait
//!
//! The orchestrator only talks to the external host through `VideoHost`, so the
//! real client can be swapped for a mock in tests.

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use vidshelf_core::AppError;

/// External host errors
#[derive(Debug, Error)]
pub enum HostError {
    /// Transfer of the file bytes failed (network, auth, quota, local read)
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Details fetch or metadata patch failed, or the response was malformed
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type HostResult<T> = Result<T, HostError>;

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Upload(msg) => AppError::HostUpload(msg),
            HostError::Request(msg) => AppError::HostRequest(msg),
            HostError::Config(msg) => AppError::Internal(msg),
        }
    }
}

/// Byte counters reported while a file is being transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_uploaded: u64,
    pub bytes_total: u64,
}

impl UploadProgress {
    pub fn new(bytes_uploaded: u64, bytes_total: u64) -> Self {
        Self {
            bytes_uploaded,
            bytes_total,
        }
    }

    /// Percentage of bytes sent, rounded to two decimals.
    pub fn percentage(&self) -> f64 {
        if self.bytes_total == 0 {
            return 0.0;
        }
        let raw = self.bytes_uploaded as f64 / self.bytes_total as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    }
}

/// Video details as reported by the host once the upload was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostVideoDetails {
    /// Embed markup (an iframe fragment) supplied by the host
    pub embed_html: String,
    pub player_embed_url: String,
    pub link: Option<String>,
    pub name: Option<String>,
    pub transcode_status: Option<String>,
}

/// Metadata changes sent to the host after upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadataPatch {
    #[serde(rename = "name")]
    pub title: String,
}

impl VideoMetadataPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// External video host
///
/// Implementations must send every progress event before `upload` returns.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait VideoHost: Send + Sync {
    /// Upload a local file and return the remote resource URI (e.g. `/videos/999`)
    async fn upload(
        &self,
        path: &Path,
        progress: UnboundedSender<UploadProgress>,
    ) -> HostResult<String>;

    /// Fetch embed markup and player URL for an uploaded video
    async fn fetch_details(&self, uri: &str) -> HostResult<HostVideoDetails>;

    /// Apply a metadata patch (the title) to an uploaded video
    async fn patch_metadata(&self, uri: &str, patch: VideoMetadataPatch) -> HostResult<()>;
}
