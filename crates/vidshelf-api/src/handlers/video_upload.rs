use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_upload_form;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use vidshelf_core::{AppError, VideoRecord};

/// Upload a video with a title
///
/// Multipart fields: `video` (the file) and `title`.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded and recorded", body = VideoRecord),
        (status = 400, description = "No video file uploaded", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let form = extract_upload_form(multipart, &state.config.upload_dir).await?;

    let Some(file) = form.file else {
        return Err(AppError::BadRequest("No video file uploaded".to_string()).into());
    };

    let record = state
        .orchestrator
        .handle_upload(Some(file), &form.title, None)
        .await?;

    Ok(Json(record))
}
