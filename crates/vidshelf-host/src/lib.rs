//! Vidshelf host client
//!
//! Abstraction over the external video hosting API plus a Vimeo-compatible
//! implementation that uploads with the tus protocol.

pub mod factory;
pub mod traits;
pub mod vimeo;

pub use factory::create_video_host;
#[cfg(any(test, feature = "test-util"))]
pub use traits::MockVideoHost;
pub use traits::{HostError, HostResult, HostVideoDetails, UploadProgress, VideoHost, VideoMetadataPatch};
pub use vimeo::VimeoClient;
