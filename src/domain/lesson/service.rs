use super::error::LessonServiceError;
use super::generator::LessonGenerator;
use super::model::{Lesson, SentencePair};
use super::text::clean_text;
use super::CreateLessonRequest;
use crate::domain::tts::{detect_language, resolve_voice_locale};
use crate::infrastructure::repositories::LessonRepository;
use crate::infrastructure::storage::AudioStore;
use async_trait::async_trait;
use chrono::Utc;
use lingua::{LanguageDetector, LanguageDetectorBuilder};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Longest sentence accepted; matches the strictest provider limit (Polly)
const MAX_SENTENCE_CHARS: usize = 3000;
const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct LessonAudio {
    pub audio: Vec<u8>,
    pub duration_seconds: f64,
    pub sentence_count: usize,
}

pub struct LessonService {
    generator: LessonGenerator,
    lesson_repo: Arc<dyn LessonRepository>,
    audio_store: Arc<dyn AudioStore>,
    language_detector: LanguageDetector,
    cache: Option<Cache<Uuid, Lesson>>,
    max_sentences: usize,
}

impl LessonService {
    pub fn new(
        generator: LessonGenerator,
        lesson_repo: Arc<dyn LessonRepository>,
        audio_store: Arc<dyn AudioStore>,
        cache_enabled: bool,
        max_sentences: usize,
    ) -> Self {
        let language_detector = LanguageDetectorBuilder::from_all_languages().build();

        // Timelines never change once generated, so reads are safe to cache
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(500)
                    .time_to_idle(Duration::from_secs(30 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            generator,
            lesson_repo,
            audio_store,
            language_detector,
            cache,
            max_sentences,
        }
    }
}

#[async_trait]
pub trait LessonServiceApi: Send + Sync {
    /// Generate a lesson from sentence pairs
    ///
    /// This operation:
    /// - Cleans and validates the sentence pairs (before any external call)
    /// - Resolves the voice locale (explicit language or detected)
    /// - Synthesizes and assembles the lesson track sequentially
    /// - Stores the track and persists the timeline
    ///
    /// Nothing is persisted unless every step succeeds
    async fn create_lesson(&self, request: CreateLessonRequest) -> Result<Lesson, LessonServiceError>;

    async fn get_lesson(&self, lesson_id: Uuid) -> Result<Lesson, LessonServiceError>;

    async fn get_lesson_audio(&self, lesson_id: Uuid) -> Result<LessonAudio, LessonServiceError>;
}

#[async_trait]
impl LessonServiceApi for LessonService {
    async fn create_lesson(&self, request: CreateLessonRequest) -> Result<Lesson, LessonServiceError> {
        let title = self.validate_title(&request.title)?;
        let pairs = self.prepare_pairs(request.sentences)?;
        let language = self.resolve_language(request.language.as_deref(), &pairs);
        let voice_locale = resolve_voice_locale(&language);

        tracing::info!(
            title = %title,
            language = %language,
            voice_locale = %voice_locale,
            sentence_count = pairs.len(),
            "Lesson generation request"
        );

        let generated = self.generator.generate(&pairs, &voice_locale).await?;

        let lesson_id = Uuid::new_v4();
        let audio_key = self
            .audio_store
            .put(lesson_id, &generated.audio)
            .await
            .map_err(LessonServiceError::Storage)?;

        let lesson = Lesson {
            id: lesson_id,
            title,
            language,
            voice_locale,
            audio_key,
            duration_seconds: generated.duration_seconds,
            sentences: generated.timeline,
            created_at: Utc::now(),
        };

        if let Err(e) = self.lesson_repo.create(&lesson).await {
            tracing::error!(error = %e, lesson_id = %lesson.id, "Failed to persist lesson");
            if let Err(cleanup) = self.audio_store.delete(&lesson.audio_key).await {
                tracing::error!(
                    error = %cleanup,
                    audio_key = %lesson.audio_key,
                    "Failed to remove audio of unsaved lesson"
                );
            }
            return Err(LessonServiceError::Storage(e.to_string()));
        }

        if let Some(cache) = &self.cache {
            cache.insert(lesson.id, lesson.clone()).await;
        }

        tracing::info!(
            lesson_id = %lesson.id,
            sentence_count = lesson.sentences.len(),
            duration_seconds = lesson.duration_seconds,
            "Lesson created"
        );

        Ok(lesson)
    }

    async fn get_lesson(&self, lesson_id: Uuid) -> Result<Lesson, LessonServiceError> {
        if let Some(cache) = &self.cache {
            if let Some(lesson) = cache.get(&lesson_id).await {
                tracing::debug!(lesson_id = %lesson_id, "Lesson cache hit");
                return Ok(lesson);
            }
        }

        let lesson = self
            .lesson_repo
            .find_by_id(lesson_id)
            .await?
            .ok_or(LessonServiceError::NotFound)?;

        if let Some(cache) = &self.cache {
            cache.insert(lesson_id, lesson.clone()).await;
        }

        Ok(lesson)
    }

    async fn get_lesson_audio(&self, lesson_id: Uuid) -> Result<LessonAudio, LessonServiceError> {
        let lesson = self.get_lesson(lesson_id).await?;
        let audio = self
            .audio_store
            .get(&lesson.audio_key)
            .await
            .map_err(LessonServiceError::Storage)?;

        Ok(LessonAudio {
            audio,
            duration_seconds: lesson.duration_seconds,
            sentence_count: lesson.sentences.len(),
        })
    }
}

impl LessonService {
    fn validate_title(&self, title: &str) -> Result<String, LessonServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LessonServiceError::Invalid(
                "Title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(LessonServiceError::Invalid(format!(
                "Title must be {} characters or less",
                MAX_TITLE_CHARS
            )));
        }
        Ok(title.to_string())
    }

    /// Clean every pair and drop the ones left without text.
    /// Order of the surviving pairs is the input order.
    fn prepare_pairs(&self, sentences: Vec<SentencePair>) -> Result<Vec<SentencePair>, LessonServiceError> {
        let submitted = sentences.len();
        let pairs: Vec<SentencePair> = sentences
            .into_iter()
            .map(|pair| SentencePair::new(clean_text(&pair.text), clean_text(&pair.translation)))
            .filter(|pair| !pair.text.is_empty())
            .collect();

        if pairs.is_empty() {
            return Err(LessonServiceError::Invalid(
                "No valid sentence pairs".to_string(),
            ));
        }
        if pairs.len() < submitted {
            tracing::warn!(
                submitted,
                kept = pairs.len(),
                "Dropped sentence pairs without text"
            );
        }
        if pairs.len() > self.max_sentences {
            return Err(LessonServiceError::Invalid(format!(
                "Lesson has {} sentences; the limit is {}",
                pairs.len(),
                self.max_sentences
            )));
        }
        let too_long = pairs
            .iter()
            .position(|p| p.text.chars().count() > MAX_SENTENCE_CHARS);
        if let Some(index) = too_long {
            return Err(LessonServiceError::Invalid(format!(
                "Sentence {} must be {} characters or less",
                index, MAX_SENTENCE_CHARS
            )));
        }

        Ok(pairs)
    }

    fn resolve_language(&self, requested: Option<&str>, pairs: &[SentencePair]) -> String {
        match requested.map(str::trim).filter(|l| !l.is_empty()) {
            Some(language) => language.to_lowercase(),
            None => {
                let sample = pairs
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let detected = detect_language(&self.language_detector, &sample);
                tracing::info!(language_detected = %detected, "Lesson language detected");
                detected.as_str().to_string()
            }
        }
    }
}
