use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line pair of an uploaded lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentencePair {
    pub text: String,
    #[serde(default)]
    pub translation: String,
}

impl SentencePair {
    pub fn new(text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: translation.into(),
        }
    }
}

/// A sentence pair with its absolute offsets (seconds) in the lesson track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSentence {
    pub text: String,
    pub translation: String,
    pub start: f64,
    pub end: f64,
}

impl TimedSentence {
    /// Whether `time` falls inside the half-open window `[start, end)`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Ordered timed sentences of one lesson; the only contract between
/// lesson generation and playback
pub type LessonTimeline = Vec<TimedSentence>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub language: String,
    pub voice_locale: String,
    pub audio_key: String,
    pub duration_seconds: f64,
    pub sentences: LessonTimeline,
    pub created_at: DateTime<Utc>,
}
