use super::lesson_repository::LessonRepository;
use crate::domain::lesson::Lesson;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Process-local lesson storage, used when no database is configured
#[derive(Default)]
pub struct InMemoryLessonRepository {
    lessons: RwLock<HashMap<Uuid, Lesson>>,
}

impl InMemoryLessonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lessons.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.read().is_empty()
    }
}

#[async_trait]
impl LessonRepository for InMemoryLessonRepository {
    async fn create(&self, lesson: &Lesson) -> AppResult<()> {
        let mut lessons = self.lessons.write();
        if lessons.contains_key(&lesson.id) {
            return Err(AppError::Internal(format!(
                "Lesson {} already exists",
                lesson.id
            )));
        }
        lessons.insert(lesson.id, lesson.clone());
        Ok(())
    }

    async fn find_by_id(&self, lesson_id: Uuid) -> AppResult<Option<Lesson>> {
        Ok(self.lessons.read().get(&lesson_id).cloned())
    }
}
