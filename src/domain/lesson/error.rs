use super::timeline::TimelineError;
use crate::domain::tts::TtsError;
use crate::error::AppError;
use crate::infrastructure::audio::AudioError;

#[derive(Debug, thiserror::Error)]
pub enum LessonServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("lesson not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsError> for LessonServiceError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::Configuration(msg) => LessonServiceError::Config(msg),
            TtsError::Provider(msg) => LessonServiceError::Dependency(msg),
        }
    }
}

impl From<AudioError> for LessonServiceError {
    fn from(err: AudioError) -> Self {
        LessonServiceError::Dependency(err.to_string())
    }
}

impl From<TimelineError> for LessonServiceError {
    fn from(err: TimelineError) -> Self {
        LessonServiceError::Dependency(format!("malformed lesson audio: {}", err))
    }
}

impl From<AppError> for LessonServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => LessonServiceError::Invalid(msg),
            AppError::NotFound(_) => LessonServiceError::NotFound,
            _ => LessonServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<LessonServiceError> for AppError {
    fn from(err: LessonServiceError) -> Self {
        match err {
            LessonServiceError::Invalid(msg) => AppError::BadRequest(msg),
            LessonServiceError::Config(msg) => AppError::Configuration(msg),
            LessonServiceError::Dependency(msg) => AppError::ExternalService(msg),
            LessonServiceError::Storage(msg) => AppError::Storage(msg),
            LessonServiceError::NotFound => AppError::NotFound("Lesson not found".to_string()),
            LessonServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
