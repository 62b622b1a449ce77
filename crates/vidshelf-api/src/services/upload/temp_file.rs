use std::fs::File;
use std::path::Path;
use tempfile::TempPath;
use vidshelf_core::AppError;

const MAX_EXTENSION_LEN: usize = 10;

/// A received upload on local disk.
///
/// The file is removed when the guard is dropped, so every exit path of the
/// upload workflow releases it. Use [`TempUpload::cleanup`] to observe the
/// removal result.
#[derive(Debug)]
pub struct TempUpload {
    path: Option<TempPath>,
}

impl TempUpload {
    pub fn new(path: TempPath) -> Self {
        Self { path: Some(path) }
    }

    /// Create a uniquely named file inside `dir`, keeping the extension of
    /// `original_name` when it looks sane.
    pub fn create_in(dir: &Path, original_name: Option<&str>) -> Result<(Self, File), AppError> {
        let suffix = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.len() <= MAX_EXTENSION_LEN)
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        let named = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create temp file in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

        let (file, path) = named.into_parts();
        Ok((Self::new(path), file))
    }

    pub fn path(&self) -> &Path {
        match &self.path {
            Some(path) => &**path,
            None => Path::new(""),
        }
    }

    /// Delete the file now, reporting failure instead of only logging it.
    pub fn cleanup(mut self) -> Result<(), AppError> {
        match self.path.take() {
            Some(path) => remove(path),
            None => Ok(()),
        }
    }
}

fn remove(path: TempPath) -> Result<(), AppError> {
    let display = path.display().to_string();
    path.close()
        .map_err(|e| AppError::Cleanup(format!("Failed to delete {}: {}", display, e)))
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = remove(path) {
                tracing::warn!(error = %e, "Temp upload cleanup failed");
            }
        }
    }
}
