//! Vidshelf Core Library
//!
//! Domain model, error taxonomy, configuration, and validation shared by the
//! store, the host client, and the HTTP API.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, HostCredentials, StoreBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::VideoRecord;
