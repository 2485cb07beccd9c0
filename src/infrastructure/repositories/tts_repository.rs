use crate::domain::tts::TtsError;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, OpenAI, ...)
///
/// Implementations synthesize exactly one request per call: no batching,
/// no caching, no retries. Output is mono MP3 at a fixed speaking rate.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Verify the provider is usable before any billable call is made
    async fn check_configuration(&self) -> Result<(), TtsError> {
        Ok(())
    }

    /// Synthesize a single sentence
    ///
    /// # Arguments
    /// * `text` - The cleaned sentence text (non-empty)
    /// * `voice_locale` - Full locale tag, e.g. `es-ES`
    ///
    /// # Errors
    /// Returns the provider's error message unchanged if synthesis fails
    async fn synthesize(&self, text: &str, voice_locale: &str) -> Result<Vec<u8>, TtsError>;
}
