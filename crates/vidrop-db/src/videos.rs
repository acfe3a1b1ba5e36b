use sqlx::PgPool;
use uuid::Uuid;
use vidrop_core::{AppError, VideoRecord};

/// Repository for finalized video records.
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a record for an already-uploaded object.
    ///
    /// `file_path` is not unique; inserting the same path twice yields two
    /// independent records.
    pub async fn create(&self, user_id: Uuid, file_path: &str) -> Result<VideoRecord, AppError> {
        let video = sqlx::query_as::<_, VideoRecord>(
            r#"
            INSERT INTO videos (file_path, user_id)
            VALUES ($1, $2)
            RETURNING id, file_path, user_id, created_at, updated_at
            "#,
        )
        .bind(file_path)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(video_id = %video.id, user_id = %user_id, "Video record created");

        Ok(video)
    }

    /// All of one user's records, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let videos = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT id, file_path, user_id, created_at, updated_at
            FROM videos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    /// One record by id, visible only to its owner.
    pub async fn find_for_user(
        &self,
        video_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<VideoRecord>, AppError> {
        let video = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT id, file_path, user_id, created_at, updated_at
            FROM videos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(video_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }
}
