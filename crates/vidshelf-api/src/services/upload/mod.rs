//! Upload workflow: temp file ownership and the orchestration sequence.

mod orchestrator;
mod temp_file;

pub use orchestrator::UploadOrchestrator;
pub use temp_file::TempUpload;
