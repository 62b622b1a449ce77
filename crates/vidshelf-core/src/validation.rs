//! Input validation for the upload workflow

use crate::AppError;

/// Validate a desired video title and return it trimmed.
pub fn validate_title(title: &str) -> Result<&str, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Please enter a title for the video".to_string(),
        ));
    }
    Ok(trimmed)
}
