use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Metadata about a video that was uploaded to the external host.
///
/// Created exactly once per successful upload and never updated afterwards.
/// `video_id` is unique across all records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub title: String,
    /// Id assigned by the external host (trailing segment of `video_url`)
    pub video_id: String,
    /// Remote resource URI, e.g. `/videos/999`
    pub video_url: String,
    /// Host-supplied HTML fragment for embedding a player
    pub embed_url: String,
    pub player_url: String,
    pub created_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        video_id: impl Into<String>,
        video_url: impl Into<String>,
        embed_url: impl Into<String>,
        player_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            video_id: video_id.into(),
            video_url: video_url.into(),
            embed_url: embed_url.into(),
            player_url: player_url.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Derive the remote video id from a host resource URI: its trailing path segment.
///
/// Returns `None` when the URI has no non-empty trailing segment.
pub fn remote_video_id(resource_uri: &str) -> Option<&str> {
    resource_uri
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_video_record_json_shape() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = VideoRecord::new(
            "Team Demo",
            "999",
            "/videos/999",
            "<iframe src=\"https://player.vimeo.com/video/999\"></iframe>",
            "https://player.vimeo.com/video/999",
        )
        .with_created_at(created_at);

        let json = serde_json::to_value(&record).expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 6);
        assert_eq!(json["title"], "Team Demo");
        assert_eq!(json["videoId"], "999");
        assert_eq!(json["videoUrl"], "/videos/999");
        assert_eq!(json["playerUrl"], "https://player.vimeo.com/video/999");
        assert!(json["embedUrl"].as_str().unwrap().starts_with("<iframe"));
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_video_record_new_stamps_creation_time() {
        let before = Utc::now();
        let record = VideoRecord::new("t", "1", "/videos/1", "<iframe>", "https://p/1");
        assert!(record.created_at >= before);
        assert!(record.created_at <= Utc::now());
    }

    #[test]
    fn test_remote_video_id() {
        assert_eq!(remote_video_id("/videos/999"), Some("999"));
        assert_eq!(
            remote_video_id("https://api.vimeo.com/videos/123456"),
            Some("123456")
        );
        assert_eq!(remote_video_id("/videos/42/"), Some("42"));
        assert_eq!(remote_video_id("999"), Some("999"));
        assert_eq!(remote_video_id(""), None);
        assert_eq!(remote_video_id("/"), None);
    }
}
