//! Vimeo-compatible host client
//!
//! Uploads go through the tus protocol: the video resource is created first,
//! then the file is streamed to the returned upload link in fixed-size chunks.
//! Every accepted chunk emits one `UploadProgress` event.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio::sync::mpsc::UnboundedSender;
use vidshelf_core::HostCredentials;

use crate::traits::{
    HostError, HostResult, HostVideoDetails, UploadProgress, VideoHost, VideoMetadataPatch,
};

const VIMEO_ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";
const TUS_RESUMABLE: &str = "1.0.0";
const TUS_CONTENT_TYPE: &str = "application/offset+octet-stream";
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    uri: String,
    upload: UploadTicket,
}

#[derive(Debug, Deserialize)]
struct UploadTicket {
    upload_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VimeoVideo {
    name: Option<String>,
    link: Option<String>,
    player_embed_url: Option<String>,
    embed: Option<VimeoEmbed>,
    transcode: Option<VimeoTranscode>,
}

#[derive(Debug, Deserialize)]
struct VimeoEmbed {
    html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VimeoTranscode {
    status: Option<String>,
}

/// Client for a Vimeo-compatible REST API
pub struct VimeoClient {
    http_client: Client,
    api_url: String,
    credentials: HostCredentials,
    chunk_size: usize,
}

impl Debug for VimeoClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VimeoClient")
            .field("api_url", &self.api_url)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl VimeoClient {
    pub fn new(
        api_url: impl Into<String>,
        credentials: HostCredentials,
        chunk_size: usize,
    ) -> HostResult<Self> {
        if chunk_size == 0 {
            return Err(HostError::Config("upload chunk size must be positive".to_string()));
        }

        // Only the connect phase is bounded; large transfers may take arbitrarily long.
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| HostError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
            chunk_size,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, VIMEO_ACCEPT);
        match (&self.credentials.access_token, &self.credentials.client_id) {
            (Some(token), _) => request.bearer_auth(token),
            (None, Some(client_id)) => {
                request.basic_auth(client_id, self.credentials.client_secret.as_deref())
            }
            (None, None) => request,
        }
    }

    /// Create the remote video resource and obtain its tus upload link.
    async fn create_upload(&self, size: u64) -> HostResult<(String, String)> {
        let response = self
            .authorize(self.http_client.post(self.endpoint("/me/videos")))
            .json(&json!({
                "upload": {
                    "approach": "tus",
                    "size": size.to_string(),
                }
            }))
            .send()
            .await
            .map_err(|e| HostError::Upload(format!("Failed to create upload: {}", e)))?;

        let response = ensure_success(response, "Create upload")
            .await
            .map_err(HostError::Upload)?;

        let created: CreateVideoResponse = response
            .json()
            .await
            .map_err(|e| HostError::Upload(format!("Failed to parse create upload response: {}", e)))?;

        let upload_link = created
            .upload
            .upload_link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| HostError::Upload("Create upload response has no upload link".to_string()))?;

        Ok((created.uri, upload_link))
    }

    async fn send_chunks(
        &self,
        path: &Path,
        upload_link: &str,
        total: u64,
        progress: &UnboundedSender<UploadProgress>,
    ) -> HostResult<()> {
        let mut file = File::open(path)
            .await
            .map_err(|e| HostError::Upload(format!("Failed to open {}: {}", path.display(), e)))?;

        let mut offset: u64 = 0;
        while offset < total {
            file.seek(SeekFrom::Start(offset))
                .await
                .map_err(|e| HostError::Upload(format!("Failed to seek local file: {}", e)))?;

            let remaining = (total - offset).min(self.chunk_size as u64);
            let mut chunk = Vec::with_capacity(remaining as usize);
            (&mut file)
                .take(remaining)
                .read_to_end(&mut chunk)
                .await
                .map_err(|e| HostError::Upload(format!("Failed to read local file: {}", e)))?;

            if chunk.is_empty() {
                return Err(HostError::Upload(format!(
                    "Local file ended at byte {} of {}",
                    offset, total
                )));
            }

            let response = self
                .http_client
                .patch(upload_link)
                .header(ACCEPT, VIMEO_ACCEPT)
                .header("Tus-Resumable", TUS_RESUMABLE)
                .header("Upload-Offset", offset.to_string())
                .header(CONTENT_TYPE, TUS_CONTENT_TYPE)
                .body(chunk)
                .send()
                .await
                .map_err(|e| HostError::Upload(format!("Failed to send chunk at offset {}: {}", offset, e)))?;

            let response = ensure_success(response, "Chunk upload")
                .await
                .map_err(HostError::Upload)?;

            let next_offset = response
                .headers()
                .get("upload-offset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .ok_or_else(|| HostError::Upload("Chunk response has no Upload-Offset".to_string()))?;

            if next_offset <= offset || next_offset > total {
                return Err(HostError::Upload(format!(
                    "Upload offset did not advance (sent at {}, server reported {})",
                    offset, next_offset
                )));
            }

            offset = next_offset;
            tracing::debug!(bytes_uploaded = offset, bytes_total = total, "Chunk accepted");
            // Receiver may have gone away; progress is observational only.
            let _ = progress.send(UploadProgress::new(offset, total));
        }

        Ok(())
    }
}

/// Pass successful responses through; otherwise read the body into an error message.
async fn ensure_success(response: Response, action: &str) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(format!("{} failed: {} - {}", action, status, error_text))
}

fn check_uri(uri: &str) -> HostResult<()> {
    if !uri.starts_with('/') || uri.trim_end_matches('/').is_empty() {
        return Err(HostError::Request(format!("Invalid video URI: {:?}", uri)));
    }
    Ok(())
}

#[async_trait]
impl VideoHost for VimeoClient {
    #[tracing::instrument(skip(self, progress), fields(path = %path.display()))]
    async fn upload(
        &self,
        path: &Path,
        progress: UnboundedSender<UploadProgress>,
    ) -> HostResult<String> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| HostError::Upload(format!("Failed to stat {}: {}", path.display(), e)))?;

        let total = metadata.len();
        if total == 0 {
            return Err(HostError::Upload("File is empty".to_string()));
        }

        let (uri, upload_link) = self.create_upload(total).await?;
        tracing::debug!(uri = %uri, bytes_total = total, "Remote video created");

        self.send_chunks(path, &upload_link, total, &progress).await?;

        tracing::info!(uri = %uri, bytes_total = total, "Upload completed");
        Ok(uri)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_details(&self, uri: &str) -> HostResult<HostVideoDetails> {
        check_uri(uri)?;

        let response = self
            .authorize(self.http_client.get(self.endpoint(uri)))
            .send()
            .await
            .map_err(|e| HostError::Request(format!("Failed to fetch video details: {}", e)))?;

        let response = ensure_success(response, "Fetch video details")
            .await
            .map_err(HostError::Request)?;

        let video: VimeoVideo = response
            .json()
            .await
            .map_err(|e| HostError::Request(format!("Failed to parse video details: {}", e)))?;

        let embed_html = video
            .embed
            .and_then(|embed| embed.html)
            .filter(|html| !html.is_empty())
            .ok_or_else(|| HostError::Request("Video details have no embed markup".to_string()))?;

        let player_embed_url = video
            .player_embed_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| HostError::Request("Video details have no player URL".to_string()))?;

        Ok(HostVideoDetails {
            embed_html,
            player_embed_url,
            link: video.link,
            name: video.name,
            transcode_status: video.transcode.and_then(|t| t.status),
        })
    }

    #[tracing::instrument(skip(self, patch))]
    async fn patch_metadata(&self, uri: &str, patch: VideoMetadataPatch) -> HostResult<()> {
        check_uri(uri)?;

        let response = self
            .authorize(self.http_client.patch(self.endpoint(uri)))
            .json(&patch)
            .send()
            .await
            .map_err(|e| HostError::Request(format!("Failed to patch video metadata: {}", e)))?;

        ensure_success(response, "Patch video metadata")
            .await
            .map_err(HostError::Request)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;
    use tokio::sync::mpsc;

    fn token_credentials() -> HostCredentials {
        HostCredentials {
            access_token: Some("tok".to_string()),
            ..Default::default()
        }
    }

    fn temp_video(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    async fn mock_create(server: &mut mockito::ServerGuard, size: &str) -> mockito::Mock {
        let upload_link = format!("{}/tus/abc", server.url());
        server
            .mock("POST", "/me/videos")
            .match_header("authorization", "Bearer tok")
            .match_header("accept", VIMEO_ACCEPT)
            .match_body(Matcher::PartialJson(json!({
                "upload": { "approach": "tus", "size": size }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "uri": "/videos/999", "upload": { "upload_link": upload_link } })
                    .to_string(),
            )
            .create_async()
            .await
    }

    async fn mock_chunk(
        server: &mut mockito::ServerGuard,
        offset: &str,
        body: &str,
        next_offset: &str,
    ) -> mockito::Mock {
        server
            .mock("PATCH", "/tus/abc")
            .match_header("tus-resumable", TUS_RESUMABLE)
            .match_header("upload-offset", offset)
            .match_header("content-type", TUS_CONTENT_TYPE)
            .match_body(body)
            .with_status(204)
            .with_header("upload-offset", next_offset)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_upload_sends_chunks_in_offset_order() {
        let mut server = mockito::Server::new_async().await;
        let create = mock_create(&mut server, "10").await;
        let first = mock_chunk(&mut server, "0", "abcd", "4").await;
        let second = mock_chunk(&mut server, "4", "efgh", "8").await;
        let third = mock_chunk(&mut server, "8", "ij", "10").await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let file = temp_video(b"abcdefghij");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let uri = client.upload(file.path(), tx).await.unwrap();
        assert_eq!(uri, "/videos/999");

        let mut percentages = Vec::new();
        while let Some(event) = rx.recv().await {
            assert_eq!(event.bytes_total, 10);
            percentages.push(event.percentage());
        }
        assert_eq!(percentages, vec![40.0, 80.0, 100.0]);

        create.assert_async().await;
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_rejects_non_advancing_offset() {
        let mut server = mockito::Server::new_async().await;
        let _create = mock_create(&mut server, "10").await;
        let _stuck = mock_chunk(&mut server, "0", "abcd", "0").await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let file = temp_video(b"abcdefghij");
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = client.upload(file.path(), tx).await.unwrap_err();
        assert!(matches!(err, HostError::Upload(ref msg) if msg.contains("did not advance")));
    }

    #[tokio::test]
    async fn test_upload_empty_file_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("POST", "/me/videos")
            .expect(0)
            .create_async()
            .await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let file = temp_video(b"");
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = client.upload(file.path(), tx).await.unwrap_err();
        assert!(matches!(err, HostError::Upload(_)));
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_unauthorized_is_upload_error() {
        let mut server = mockito::Server::new_async().await;
        let _create = server
            .mock("POST", "/me/videos")
            .with_status(401)
            .with_body("{\"error\":\"Unauthorized\"}")
            .create_async()
            .await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let file = temp_video(b"abc");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let err = client.upload(file.path(), tx).await.unwrap_err();
        assert!(matches!(err, HostError::Upload(ref msg) if msg.contains("401")));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_details() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/videos/999")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "uri": "/videos/999",
                    "name": "clip.mp4",
                    "link": "https://vimeo.com/999",
                    "player_embed_url": "https://player.vimeo.com/video/999",
                    "embed": { "html": "<iframe src=\"https://player.vimeo.com/video/999\"></iframe>" },
                    "transcode": { "status": "in_progress" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let details = client.fetch_details("/videos/999").await.unwrap();

        assert_eq!(details.player_embed_url, "https://player.vimeo.com/video/999");
        assert!(details.embed_html.starts_with("<iframe"));
        assert_eq!(details.link.as_deref(), Some("https://vimeo.com/999"));
        assert_eq!(details.transcode_status.as_deref(), Some("in_progress"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_details_without_embed_is_request_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/videos/999")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "uri": "/videos/999" }).to_string())
            .create_async()
            .await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let err = client.fetch_details("/videos/999").await.unwrap_err();
        assert!(matches!(err, HostError::Request(_)));
    }

    #[tokio::test]
    async fn test_fetch_details_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/videos/404")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        let err = client.fetch_details("/videos/404").await.unwrap_err();
        assert!(matches!(err, HostError::Request(ref msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_invalid_uri_is_rejected_locally() {
        let client = VimeoClient::new("http://127.0.0.1:1", token_credentials(), 4).unwrap();
        let err = client.fetch_details("videos/999").await.unwrap_err();
        assert!(matches!(err, HostError::Request(_)));
    }

    #[tokio::test]
    async fn test_patch_metadata_sends_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/videos/999")
            .match_body(Matcher::Json(json!({ "name": "Team Demo" })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = VimeoClient::new(server.url(), token_credentials(), 4).unwrap();
        client
            .patch_metadata("/videos/999", VideoMetadataPatch::title("Team Demo"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_basic_auth_without_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/videos/1")
            .match_header("authorization", "Basic aWQ6c2VjcmV0")
            .with_status(204)
            .create_async()
            .await;

        let credentials = HostCredentials {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            access_token: None,
        };
        let client = VimeoClient::new(server.url(), credentials, 4).unwrap();
        client
            .patch_metadata("/videos/1", VideoMetadataPatch::title("x"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = VimeoClient::new("https://api.vimeo.com", token_credentials(), 0).unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }
}
