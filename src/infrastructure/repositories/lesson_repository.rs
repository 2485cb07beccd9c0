use crate::domain::lesson::{Lesson, LessonTimeline};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

/// Durable storage for generated lessons and their timelines
#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn create(&self, lesson: &Lesson) -> AppResult<()>;

    async fn find_by_id(&self, lesson_id: Uuid) -> AppResult<Option<Lesson>>;

    /// Whether the backing store is reachable
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct LessonRow {
    id: Uuid,
    title: String,
    language: String,
    voice_locale: String,
    audio_key: String,
    duration_seconds: f64,
    timeline: Json<LessonTimeline>,
    created_at: DateTime<Utc>,
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            language: row.language,
            voice_locale: row.voice_locale,
            audio_key: row.audio_key,
            duration_seconds: row.duration_seconds,
            sentences: row.timeline.0,
            created_at: row.created_at,
        }
    }
}

pub struct PgLessonRepository {
    pool: Arc<DbPool>,
}

impl PgLessonRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for PgLessonRepository {
    /// Insert a lesson together with its timeline (stored as jsonb)
    async fn create(&self, lesson: &Lesson) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO lessons (id, title, language, voice_locale, audio_key, duration_seconds, timeline, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(lesson.id)
        .bind(&lesson.title)
        .bind(&lesson.language)
        .bind(&lesson.voice_locale)
        .bind(&lesson.audio_key)
        .bind(lesson.duration_seconds)
        .bind(Json(&lesson.sentences))
        .bind(lesson.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, lesson_id: Uuid) -> AppResult<Option<Lesson>> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, title, language, voice_locale, audio_key, duration_seconds, timeline, created_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Lesson::from))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await?;
        Ok(())
    }
}
