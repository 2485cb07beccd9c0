pub mod error;
pub mod language;

pub use error::TtsError;
pub use language::{detect_language, resolve_voice_locale, LanguageCode};
