use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::lesson::{CreateLessonRequest, LessonResponse, LessonService, LessonServiceApi},
    error::{AppError, AppResult},
};

pub struct LessonController {
    lesson_service: Arc<LessonService>,
}

impl LessonController {
    pub fn new(lesson_service: Arc<LessonService>) -> Self {
        Self { lesson_service }
    }

    /// POST /api/lessons - Generate a lesson track and its timeline
    pub async fn create_lesson(
        State(controller): State<Arc<LessonController>>,
        Json(request): Json<CreateLessonRequest>,
    ) -> AppResult<(StatusCode, Json<LessonResponse>)> {
        let lesson = controller.lesson_service.create_lesson(request).await?;
        Ok((StatusCode::CREATED, Json(LessonResponse::from(lesson))))
    }

    /// GET /api/lessons/{lessonId} - Lesson metadata and timeline
    pub async fn get_lesson(
        State(controller): State<Arc<LessonController>>,
        Path(lesson_id): Path<Uuid>,
    ) -> AppResult<Json<LessonResponse>> {
        let lesson = controller.lesson_service.get_lesson(lesson_id).await?;
        Ok(Json(LessonResponse::from(lesson)))
    }

    /// GET /api/lessons/{lessonId}/audio - The assembled lesson track
    pub async fn get_lesson_audio(
        State(controller): State<Arc<LessonController>>,
        Path(lesson_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let lesson_audio = controller.lesson_service.get_lesson_audio(lesson_id).await?;

        let duration = HeaderValue::from_str(&format!("{:.3}", lesson_audio.duration_seconds))
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(lesson_audio.audio.len()));
        headers.insert("X-Duration-Seconds", duration);
        headers.insert(
            "X-Sentence-Count",
            HeaderValue::from(lesson_audio.sentence_count),
        );

        Ok((StatusCode::OK, headers, Body::from(lesson_audio.audio)))
    }
}
