use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use vidshelf_core::{AppError, VideoRecord};

use super::traits::VideoRecordStore;

/// Postgres-backed video record repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VideoRecordStore for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<VideoRecord>, AppError> {
        let videos = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            SELECT title, video_id, video_url, embed_url, player_url, created_at
            FROM videos
            ORDER BY created_at DESC, video_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "videos", db.operation = "insert", db.record_id = %record.video_id))]
    async fn create(&self, record: VideoRecord) -> Result<VideoRecord, AppError> {
        let result = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            INSERT INTO videos (title, video_id, video_url, embed_url, player_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING title, video_id, video_url, embed_url, player_url, created_at
            "#,
        )
        .bind(&record.title)
        .bind(&record.video_id)
        .bind(&record.video_url)
        .bind(&record.embed_url)
        .bind(&record.player_url)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(video) => Ok(video),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::DuplicateKey(record.video_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
