use super::tts_repository::TtsRepository;
use crate::domain::tts::TtsError;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, LanguageCode, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly rejects requests longer than this
pub const MAX_TEXT_LENGTH: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    sample_rate: u32,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, sample_rate: u32) -> Self {
        Self {
            polly_client,
            sample_rate,
        }
    }

    /// The provider limit is on characters, not UTF-8 bytes
    fn check_text_length(text: &str) -> Result<(), TtsError> {
        let characters = text.chars().count();
        if characters > MAX_TEXT_LENGTH {
            return Err(TtsError::Provider(format!(
                "Sentence of {} characters exceeds the Polly limit of {}",
                characters, MAX_TEXT_LENGTH
            )));
        }
        Ok(())
    }

    /// Select the neural Polly voice for a locale
    fn voice_for_locale(locale: &str) -> Option<&'static str> {
        let voice = match locale {
            "en-US" => "Joanna",
            "en-GB" => "Amy",
            "es-ES" => "Lucia",
            "es-US" => "Lupe",
            "fr-FR" => "Lea",
            "de-DE" => "Vicki",
            "it-IT" => "Bianca",
            "pt-PT" => "Ines",
            "pt-BR" => "Camila",
            "ko-KR" => "Seoyeon",
            "ja-JP" => "Takumi",
            "cmn-CN" => "Zhiyu",
            _ => return None,
        };
        Some(voice)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn check_configuration(&self) -> Result<(), TtsError> {
        if self.polly_client.config().region().is_none() {
            return Err(TtsError::Configuration(
                "AWS region is not configured for Polly".to_string(),
            ));
        }
        Ok(())
    }

    async fn synthesize(&self, text: &str, voice_locale: &str) -> Result<Vec<u8>, TtsError> {
        let start_time = std::time::Instant::now();

        Self::check_text_length(text)?;

        let voice_name = Self::voice_for_locale(voice_locale).ok_or_else(|| {
            TtsError::Provider(format!("No Polly voice for locale {}", voice_locale))
        })?;
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;

        tracing::debug!(
            locale = voice_locale,
            voice = voice_name,
            text_length = text.chars().count(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .language_code(LanguageCode::from(voice_locale))
            .output_format(OutputFormat::Mp3)
            .sample_rate(self.sample_rate.to_string())
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    locale = voice_locale,
                    voice = voice_name,
                    engine = ?engine,
                    text_length = text.chars().count(),
                    "AWS Polly synthesize_speech failed"
                );
                TtsError::Provider(format!("AWS Polly error: {}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            TtsError::Provider(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();

        tracing::info!(
            provider = "polly",
            locale = voice_locale,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.chars().count(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(audio_bytes)
    }
}
