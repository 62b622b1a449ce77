//! Error types module
//!
//! All failures of the upload workflow and the record store are unified under
//! `AppError`. The HTTP layer renders every variant as a human-readable
//! `{ "error": ... }` body; only `BadRequest` maps to a 4xx status.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed requests
    Debug,
    /// Warning level - for non-fatal issues like temp file cleanup
    Warn,
    /// Error level - for failed uploads and store failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code, used in logs only
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input to the upload workflow (missing file, empty title)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed HTTP request caught before the workflow starts
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The external host rejected or failed the file transfer
    #[error("Host upload error: {0}")]
    HostUpload(String),

    /// A details fetch or metadata patch against the external host failed
    #[error("Host request error: {0}")]
    HostRequest(String),

    /// A record with the same remote video id already exists
    #[error("Duplicate key: video {0} already exists")]
    DuplicateKey(String),

    /// Temp file deletion failed. Never returned to callers, only logged.
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::Validation(_) => (500, "VALIDATION_ERROR", LogLevel::Warn),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", LogLevel::Debug),
        AppError::HostUpload(_) => (500, "HOST_UPLOAD_ERROR", LogLevel::Error),
        AppError::HostRequest(_) => (500, "HOST_REQUEST_ERROR", LogLevel::Error),
        AppError::DuplicateKey(_) => (500, "DUPLICATE_KEY", LogLevel::Error),
        AppError::Cleanup(_) => (500, "CLEANUP_ERROR", LogLevel::Warn),
        AppError::Database(_) => (500, "DATABASE_ERROR", LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::BadRequest(_) => "BadRequest",
            AppError::HostUpload(_) => "HostUploadError",
            AppError::HostRequest(_) => "HostRequestError",
            AppError::DuplicateKey(_) => "DuplicateKeyError",
            AppError::Cleanup(_) => "CleanupError",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::HostUpload(_) => "Error uploading video".to_string(),
            AppError::HostRequest(_) => "Error processing video".to_string(),
            AppError::DuplicateKey(ref id) => format!("Video {} already exists", id),
            AppError::Cleanup(_) => "Error cleaning up file".to_string(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal Server Error".to_string()
            }
        }
    }
}
