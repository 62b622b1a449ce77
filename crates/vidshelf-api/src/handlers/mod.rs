pub mod ui;
pub mod video_upload;
pub mod videos;
