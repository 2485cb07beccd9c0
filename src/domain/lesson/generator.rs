use super::assembler::{AudioAssembler, LessonSilences, RenderedSegment};
use super::error::LessonServiceError;
use super::model::{SentencePair, TimedSentence};
use super::timeline::build_timeline;
use crate::infrastructure::audio::{AudioProcessor, WorkDir};
use crate::infrastructure::repositories::TtsRepository;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

/// Tolerated difference between the probed track length and the timeline end
const TRACK_DRIFT_WARN_MS: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub silence_short_secs: f64,
    pub silence_long_secs: f64,
    pub work_root: PathBuf,
}

#[derive(Debug)]
pub struct GeneratedLesson {
    pub audio: Vec<u8>,
    pub timeline: Vec<TimedSentence>,
    pub duration_seconds: f64,
}

/// Turns sentence pairs into one lesson track plus its timeline.
///
/// Sentences are synthesized and assembled strictly one after another in
/// input order. Any failure aborts the whole lesson; the work directory is
/// purged whether generation succeeds or not.
pub struct LessonGenerator {
    tts_repo: Arc<dyn TtsRepository>,
    assembler: AudioAssembler,
    settings: GenerationSettings,
}

impl LessonGenerator {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        audio: Arc<dyn AudioProcessor>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            tts_repo,
            assembler: AudioAssembler::new(audio),
            settings,
        }
    }

    pub async fn generate(
        &self,
        pairs: &[SentencePair],
        voice_locale: &str,
    ) -> Result<GeneratedLesson, LessonServiceError> {
        if pairs.is_empty() {
            return Err(LessonServiceError::Invalid(
                "Lesson has no sentences".to_string(),
            ));
        }
        if let Some(index) = pairs.iter().position(|p| p.text.trim().is_empty()) {
            return Err(LessonServiceError::Invalid(format!(
                "Sentence {} has no text",
                index
            )));
        }

        self.tts_repo.check_configuration().await?;

        let mut work_dir = WorkDir::create(&self.settings.work_root)
            .await
            .context("failed to create lesson work directory")?;

        let started = std::time::Instant::now();
        let result = self.render(&work_dir, pairs, voice_locale).await;

        if let Err(e) = work_dir.purge().await {
            tracing::error!(
                error = %e,
                path = %work_dir.path().display(),
                "Failed to purge lesson work directory"
            );
        }

        match &result {
            Ok(lesson) => tracing::info!(
                sentence_count = pairs.len(),
                voice_locale,
                duration_seconds = lesson.duration_seconds,
                audio_size_bytes = lesson.audio.len(),
                latency_ms = started.elapsed().as_millis(),
                "Lesson audio generated"
            ),
            Err(e) => tracing::error!(
                error = %e,
                sentence_count = pairs.len(),
                voice_locale,
                "Lesson generation failed"
            ),
        }

        result
    }

    async fn render(
        &self,
        work_dir: &WorkDir,
        pairs: &[SentencePair],
        voice_locale: &str,
    ) -> Result<GeneratedLesson, LessonServiceError> {
        let silences = self
            .assembler
            .render_silences(
                work_dir,
                self.settings.silence_short_secs,
                self.settings.silence_long_secs,
            )
            .await?;

        let drills = self
            .render_drills(work_dir, pairs, voice_locale, &silences)
            .await?;

        let durations: Vec<f64> = drills.iter().map(|d| d.duration_ms).collect();
        let timeline = build_timeline(pairs, &durations, silences.long.duration_ms)?;

        let track = self
            .assembler
            .assemble_track(work_dir, &drills, &silences)
            .await?;

        let timeline_end_ms = timeline.last().map(|s| s.end * 1000.0).unwrap_or(0.0);
        let drift_ms = track.duration_ms - timeline_end_ms;
        if drift_ms.abs() > TRACK_DRIFT_WARN_MS {
            tracing::warn!(
                track_ms = track.duration_ms,
                timeline_end_ms,
                drift_ms,
                "Probed track length differs from timeline end"
            );
        }

        Ok(GeneratedLesson {
            audio: track.audio,
            timeline,
            duration_seconds: track.duration_ms / 1000.0,
        })
    }

    async fn render_drills(
        &self,
        work_dir: &WorkDir,
        pairs: &[SentencePair],
        voice_locale: &str,
        silences: &LessonSilences,
    ) -> Result<Vec<RenderedSegment>, LessonServiceError> {
        let mut drills = Vec::with_capacity(pairs.len());

        for (index, pair) in pairs.iter().enumerate() {
            let clip = self
                .tts_repo
                .synthesize(&pair.text, voice_locale)
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        sentence_index = index,
                        voice_locale,
                        "Sentence synthesis failed"
                    );
                    LessonServiceError::from(e)
                })?;

            let drill = self
                .assembler
                .assemble_sentence(work_dir, index, &clip, silences)
                .await?;
            drills.push(drill);
        }

        Ok(drills)
    }
}
