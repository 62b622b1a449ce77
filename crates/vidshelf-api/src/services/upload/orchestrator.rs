//! Upload orchestration
//!
//! Sequence: validate, upload to the host, fetch details, patch the title,
//! persist the record, delete the temp file. Each remote step waits for the
//! previous one. Failures after the host accepted the file leave the remote
//! video in place; its URI is logged so it can be found later.

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use vidshelf_core::models::remote_video_id;
use vidshelf_core::validation::validate_title;
use vidshelf_core::{AppError, VideoRecord};
use vidshelf_db::VideoRecordStore;
use vidshelf_host::{UploadProgress, VideoHost, VideoMetadataPatch};

use super::TempUpload;

pub struct UploadOrchestrator {
    host: Arc<dyn VideoHost>,
    store: Arc<dyn VideoRecordStore>,
}

impl UploadOrchestrator {
    pub fn new(host: Arc<dyn VideoHost>, store: Arc<dyn VideoRecordStore>) -> Self {
        Self { host, store }
    }

    /// Run the full upload sequence for one received file.
    ///
    /// Progress percentages (rounded to two decimals) are forwarded to
    /// `progress` while the transfer runs; all of them are sent before this
    /// returns. The temp file is gone when this returns, on every path.
    #[tracing::instrument(skip_all, fields(title = %title))]
    pub async fn handle_upload(
        &self,
        file: Option<TempUpload>,
        title: &str,
        progress: Option<UnboundedSender<f64>>,
    ) -> Result<VideoRecord, AppError> {
        let file = file.ok_or_else(|| {
            AppError::Validation("Please select a video file to upload".to_string())
        })?;
        let title = validate_title(title)?;

        let uri = self.upload(&file, progress).await?;

        let record = match self.finish(&uri, title).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    uri = %uri,
                    error = %e,
                    "Video uploaded to host but not recorded"
                );
                return Err(e);
            }
        };

        if let Err(e) = file.cleanup() {
            tracing::warn!(error = %e, video_id = %record.video_id, "Temp file not deleted");
        }

        tracing::info!(video_id = %record.video_id, "Video upload completed");
        Ok(record)
    }

    async fn upload(
        &self,
        file: &TempUpload,
        progress: Option<UnboundedSender<f64>>,
    ) -> Result<String, AppError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<UploadProgress>();

        // Drains until the host drops its sender, i.e. until the upload resolves.
        let relay = async move {
            while let Some(event) = rx.recv().await {
                let percentage = event.percentage();
                tracing::debug!(
                    percentage,
                    bytes_uploaded = event.bytes_uploaded,
                    bytes_total = event.bytes_total,
                    "Upload progress"
                );
                if let Some(progress) = &progress {
                    let _ = progress.send(percentage);
                }
            }
        };

        let (result, ()) = tokio::join!(self.host.upload(file.path(), tx), relay);
        Ok(result?)
    }

    async fn finish(&self, uri: &str, title: &str) -> Result<VideoRecord, AppError> {
        let video_id = remote_video_id(uri).ok_or_else(|| {
            AppError::HostRequest(format!("Cannot derive video id from URI {:?}", uri))
        })?;

        let details = self.host.fetch_details(uri).await?;
        tracing::debug!(
            uri = %uri,
            transcode_status = ?details.transcode_status,
            "Fetched video details"
        );

        self.host
            .patch_metadata(uri, VideoMetadataPatch::title(title))
            .await?;

        let record = VideoRecord::new(
            title,
            video_id,
            uri,
            details.embed_html,
            details.player_embed_url,
        );
        self.store.create(record).await
    }
}
