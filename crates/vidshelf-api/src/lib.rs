//! Vidshelf API Library
//!
//! HTTP handlers, the upload orchestrator, and application setup.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
pub use services::upload::{TempUpload, UploadOrchestrator};
