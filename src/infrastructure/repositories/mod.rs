pub mod in_memory_lesson_repository;
pub mod lesson_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod tts_repository;

pub use in_memory_lesson_repository::InMemoryLessonRepository;
pub use lesson_repository::{LessonRepository, PgLessonRepository};
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;
