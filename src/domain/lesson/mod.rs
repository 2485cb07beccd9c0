pub mod assembler;
pub mod error;
pub mod generator;
pub mod model;
pub mod pattern;
pub mod service;
pub mod text;
pub mod timeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::LessonServiceError;
pub use generator::{GeneratedLesson, GenerationSettings, LessonGenerator};
pub use model::{Lesson, LessonTimeline, SentencePair, TimedSentence};
pub use service::{LessonAudio, LessonService, LessonServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/lessons
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub sentences: Vec<SentencePair>,
}

/// Response for lesson endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub title: String,
    pub language: String,
    pub voice_locale: String,
    pub audio_url: String,
    pub duration_seconds: f64,
    pub sentences: Vec<TimedSentence>,
    pub created_at: DateTime<Utc>,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            audio_url: format!("/api/lessons/{}/audio", lesson.id),
            id: lesson.id,
            title: lesson.title,
            language: lesson.language,
            voice_locale: lesson.voice_locale,
            duration_seconds: lesson.duration_seconds,
            sentences: lesson.sentences,
            created_at: lesson.created_at,
        }
    }
}
