//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p vidshelf-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vidshelf_api::setup::routes;
use vidshelf_api::state::AppState;
use vidshelf_core::{AppError, Config, VideoRecord};
use vidshelf_db::VideoRecordStore;
use vidshelf_host::{HostVideoDetails, MockVideoHost};

pub const EMBED_HTML: &str =
    "<iframe src=\"https://player.vimeo.com/video/999\" width=\"640\" height=\"360\"></iframe>";
pub const PLAYER_URL: &str = "https://player.vimeo.com/video/999";

/// Test application: server plus the owned upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files left behind in the upload directory.
    pub fn leftover_uploads(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload directory")
            .count()
    }
}

pub fn create_test_config(upload_dir: &Path) -> Config {
    let map: HashMap<String, String> = [
        ("DATABASE_CONNECTION_STRING", "memory://"),
        ("HOST_ACCESS_TOKEN", "test-token"),
        ("ENVIRONMENT", "test"),
        ("UPLOAD_DIR", upload_dir.to_str().expect("utf-8 temp path")),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Config::from_lookup(|key| map.get(key).cloned()).expect("Failed to build test config")
}

/// Setup a test app around the given host mock and store.
pub fn setup_test_app(host: MockVideoHost, store: Arc<dyn VideoRecordStore>) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(upload_dir.path());

    let state = Arc::new(AppState::new(config.clone(), store, Arc::new(host)));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, upload_dir }
}

pub fn sample_details() -> HostVideoDetails {
    HostVideoDetails {
        embed_html: EMBED_HTML.to_string(),
        player_embed_url: PLAYER_URL.to_string(),
        link: Some("https://vimeo.com/999".to_string()),
        name: Some("clip.mp4".to_string()),
        transcode_status: Some("in_progress".to_string()),
    }
}

/// A host that must never be called.
pub fn unused_host() -> MockVideoHost {
    let mut host = MockVideoHost::new();
    host.expect_upload().never();
    host.expect_fetch_details().never();
    host.expect_patch_metadata().never();
    host
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl VideoRecordStore for FailingStore {
    async fn list(&self) -> Result<Vec<VideoRecord>, AppError> {
        Err(AppError::Internal("store unavailable".to_string()))
    }

    async fn create(&self, _record: VideoRecord) -> Result<VideoRecord, AppError> {
        Err(AppError::Internal("store unavailable".to_string()))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(AppError::Internal("store unavailable".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
