use lingua::{Language, LanguageDetector};
use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes lessons can be generated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
}

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Korean => "ko",
            LanguageCode::Japanese => "ja",
            LanguageCode::Chinese => "zh",
        }
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Self {
        match language {
            Language::English => LanguageCode::English,
            Language::Spanish => LanguageCode::Spanish,
            Language::French => LanguageCode::French,
            Language::German => LanguageCode::German,
            Language::Italian => LanguageCode::Italian,
            Language::Portuguese => LanguageCode::Portuguese,
            Language::Korean => LanguageCode::Korean,
            Language::Japanese => LanguageCode::Japanese,
            Language::Chinese => LanguageCode::Chinese,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Short language code -> full locale tag understood by the TTS providers
const VOICE_LOCALES: &[(&str, &str)] = &[
    ("en", "en-US"),
    ("es", "es-ES"),
    ("fr", "fr-FR"),
    ("de", "de-DE"),
    ("it", "it-IT"),
    ("pt", "pt-PT"),
    ("ko", "ko-KR"),
    ("ja", "ja-JP"),
    ("zh", "cmn-CN"),
];

/// Resolve a short language code to its voice locale.
/// Codes missing from the table are returned unchanged.
pub fn resolve_voice_locale(language: &str) -> String {
    let language = language.trim();
    VOICE_LOCALES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(language))
        .map(|(_, locale)| locale.to_string())
        .unwrap_or_else(|| language.to_string())
}

/// Detect the language of the given text, falling back to English
pub fn detect_language(detector: &LanguageDetector, text: &str) -> LanguageCode {
    match detector.detect_language_of(text) {
        Some(language) => LanguageCode::from_lingua(language),
        None => {
            tracing::warn!("Could not detect language, falling back to English");
            LanguageCode::English
        }
    }
}
