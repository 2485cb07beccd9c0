//! In-process stand-ins for the TTS provider and the audio tools.
//!
//! Fake audio is text: every segment is `[<ms>]`, concatenation joins the
//! bytes and probing sums the bracketed millisecond values, so measured
//! durations behave exactly like stream-level joining.

use crate::domain::tts::TtsError;
use crate::infrastructure::audio::{AudioError, AudioProcessor};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_CLIP_MS: u64 = 500;

pub fn encode_ms(ms: u64) -> String {
    format!("[{}]", ms)
}

pub fn decode_total_ms(bytes: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(bytes).ok()?;
    let mut total = 0.0;
    let mut found = false;
    for token in text.split('[').skip(1) {
        let value = token.strip_suffix(']')?;
        total += value.parse::<u64>().ok()? as f64;
        found = true;
    }
    found.then_some(total)
}

pub struct FakeTts {
    clips: HashMap<String, u64>,
    failures: HashMap<String, TtsError>,
    silent: Vec<String>,
    misconfigured: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeTts {
    pub fn new(clips: &[(&str, u64)]) -> Self {
        Self {
            clips: clips.iter().map(|(t, ms)| (t.to_string(), *ms)).collect(),
            failures: HashMap::new(),
            silent: Vec::new(),
            misconfigured: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, text: &str, error: TtsError) -> Self {
        self.failures.insert(text.to_string(), error);
        self
    }

    pub fn silent_on(mut self, text: &str) -> Self {
        self.silent.push(text.to_string());
        self
    }

    pub fn misconfigured(mut self, message: &str) -> Self {
        self.misconfigured = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TtsRepository for FakeTts {
    async fn check_configuration(&self) -> Result<(), TtsError> {
        match &self.misconfigured {
            Some(msg) => Err(TtsError::Configuration(msg.clone())),
            None => Ok(()),
        }
    }

    async fn synthesize(&self, text: &str, voice_locale: &str) -> Result<Vec<u8>, TtsError> {
        self.calls
            .lock()
            .push((text.to_string(), voice_locale.to_string()));

        if let Some(error) = self.failures.get(text) {
            return Err(error.clone());
        }
        if self.silent.iter().any(|t| t == text) {
            return Ok(Vec::new());
        }
        let ms = self.clips.get(text).copied().unwrap_or(DEFAULT_CLIP_MS);
        Ok(encode_ms(ms).into_bytes())
    }
}

pub struct FakeAudioProcessor;

#[async_trait]
impl AudioProcessor for FakeAudioProcessor {
    async fn make_silence(&self, duration_secs: f64) -> Result<Vec<u8>, AudioError> {
        Ok(encode_ms((duration_secs * 1000.0).round() as u64).into_bytes())
    }

    async fn concat(&self, segments: &[PathBuf]) -> Result<Vec<u8>, AudioError> {
        let mut joined = Vec::new();
        for segment in segments {
            joined.extend(tokio::fs::read(segment).await?);
        }
        Ok(joined)
    }

    async fn probe_duration_ms(&self, path: &Path) -> Result<f64, AudioError> {
        let bytes = tokio::fs::read(path).await?;
        decode_total_ms(&bytes).ok_or_else(|| AudioError::MalformedOutput {
            program: "fake-ffprobe".to_string(),
            detail: path.display().to_string(),
        })
    }
}

/// Fails like a missing ffmpeg binary
pub struct FailingAudio;

#[async_trait]
impl AudioProcessor for FailingAudio {
    async fn make_silence(&self, _duration_secs: f64) -> Result<Vec<u8>, AudioError> {
        Err(AudioError::Failed {
            program: "ffmpeg".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "Unknown encoder 'libmp3lame'".to_string(),
        })
    }

    async fn concat(&self, _segments: &[PathBuf]) -> Result<Vec<u8>, AudioError> {
        Err(AudioError::Invalid("unavailable".to_string()))
    }

    async fn probe_duration_ms(&self, _path: &Path) -> Result<f64, AudioError> {
        Err(AudioError::Invalid("unavailable".to_string()))
    }
}
