/// Failures reported by a TTS provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum TtsError {
    /// Missing or unusable provider credentials/settings
    #[error("TTS configuration error: {0}")]
    Configuration(String),
    /// Transport, quota or provider-side failure; carries the provider message verbatim
    #[error("{0}")]
    Provider(String),
}
