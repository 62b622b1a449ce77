//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidshelf_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidshelf API",
        version = "0.1.0",
        description = "Upload videos to an external video host and browse the recorded uploads."
    ),
    paths(
        handlers::videos::list_videos,
        handlers::video_upload::upload_video,
    ),
    components(schemas(models::VideoRecord, error::ErrorResponse)),
    tags(
        (name = "videos", description = "Video upload and listing")
    )
)]
struct ApiDoc;
