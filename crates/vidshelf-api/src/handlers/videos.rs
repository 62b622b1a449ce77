use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use vidshelf_core::VideoRecord;

/// List all recorded videos, newest first
#[utoipa::path(
    get,
    path = "/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Recorded videos, newest first", body = Vec<VideoRecord>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VideoRecord>>, HttpAppError> {
    let videos = state.store.list().await?;
    Ok(Json(videos))
}
