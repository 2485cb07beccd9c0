use super::tts_repository::TtsRepository;
use crate::domain::tts::TtsError;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
pub const MAX_TEXT_LENGTH: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    api_key_present: bool,
    model: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, api_key_present: bool, model: String) -> Self {
        Self {
            client,
            api_key_present,
            model,
        }
    }

    /// The provider limit is on characters, not UTF-8 bytes
    fn check_text_length(text: &str) -> Result<(), TtsError> {
        let characters = text.chars().count();
        if characters > MAX_TEXT_LENGTH {
            return Err(TtsError::Provider(format!(
                "Sentence of {} characters exceeds the OpenAI limit of {}",
                characters, MAX_TEXT_LENGTH
            )));
        }
        Ok(())
    }

    /// OpenAI voices are multilingual; pick one per locale family so
    /// the same lesson language always sounds the same
    fn voice_for_locale(locale: &str) -> Voice {
        let language = locale.split('-').next().unwrap_or(locale);
        match language {
            "en" => Voice::Alloy,
            "es" => Voice::Echo,
            "fr" | "it" => Voice::Nova,
            "de" => Voice::Onyx,
            "pt" => Voice::Shimmer,
            _ => Voice::Fable,
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn check_configuration(&self) -> Result<(), TtsError> {
        if !self.api_key_present {
            return Err(TtsError::Configuration(
                "OpenAI API key is not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn synthesize(&self, text: &str, voice_locale: &str) -> Result<Vec<u8>, TtsError> {
        let start_time = std::time::Instant::now();

        Self::check_text_length(text)?;

        let voice = Self::voice_for_locale(voice_locale);

        tracing::debug!(
            model = %self.model,
            locale = voice_locale,
            voice = ?voice,
            text_length = text.chars().count(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,           // Defaults to 1.0
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                locale = voice_locale,
                text_length = text.chars().count(),
                "OpenAI TTS API call failed"
            );
            TtsError::Provider(format!("OpenAI TTS error: {}", e))
        })?;

        let audio_bytes = response.bytes.to_vec();

        tracing::info!(
            provider = "openai",
            model = %self.model,
            locale = voice_locale,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.chars().count(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(audio_bytes)
    }
}
