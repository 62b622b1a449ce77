//! Application state shared by all handlers.

use crate::services::upload::UploadOrchestrator;
use std::sync::Arc;
use vidshelf_core::Config;
use vidshelf_db::VideoRecordStore;
use vidshelf_host::VideoHost;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn VideoRecordStore>,
    pub orchestrator: UploadOrchestrator,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn VideoRecordStore>,
        host: Arc<dyn VideoHost>,
    ) -> Self {
        let orchestrator = UploadOrchestrator::new(host, store.clone());
        Self {
            config,
            store,
            orchestrator,
        }
    }
}
