//! Multipart form handling for video uploads

use crate::services::upload::TempUpload;
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use vidshelf_core::AppError;

pub const VIDEO_FIELD: &str = "video";
pub const TITLE_FIELD: &str = "title";

/// Parsed upload form. `file` is `None` when no file part was sent.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<TempUpload>,
    pub title: String,
}

/// Read the `video` file part and the `title` text field.
///
/// The file part is streamed to a temp file in `upload_dir` chunk by chunk.
/// An empty file part without a file name (what a browser sends when nothing
/// was selected) counts as missing.
pub async fn extract_upload_form(
    mut multipart: Multipart,
    upload_dir: &Path,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            VIDEO_FIELD => {
                if form.file.is_some() {
                    return Err(AppError::BadRequest(
                        "Multiple video fields are not allowed".to_string(),
                    ));
                }
                form.file = receive_file(field, upload_dir).await?;
            }
            TITLE_FIELD => {
                form.title = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read title: {}", e))
                })?;
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

async fn receive_file(
    mut field: Field<'_>,
    upload_dir: &Path,
) -> Result<Option<TempUpload>, AppError> {
    let original_name = field.file_name().map(|s| s.to_string());
    let (upload, file) = TempUpload::create_in(upload_dir, original_name.as_deref())?;
    let mut file = tokio::fs::File::from_std(file);

    let mut size: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?
    {
        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    file.flush().await?;

    if size == 0 && original_name.as_deref().map_or(true, str::is_empty) {
        return Ok(None);
    }

    tracing::debug!(
        path = %upload.path().display(),
        original_name = ?original_name,
        size,
        "Received upload"
    );
    Ok(Some(upload))
}
