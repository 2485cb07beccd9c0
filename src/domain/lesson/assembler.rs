use super::pattern::{build_pattern, build_track};
use crate::infrastructure::audio::{AudioError, AudioProcessor, WorkDir};
use std::path::PathBuf;
use std::sync::Arc;

/// A rendered, measured audio file inside the work directory
#[derive(Debug, Clone)]
pub struct RenderedSegment {
    pub path: PathBuf,
    pub duration_ms: f64,
}

/// The two silences shared by every sentence of one lesson
#[derive(Debug, Clone)]
pub struct LessonSilences {
    pub short: RenderedSegment,
    pub long: RenderedSegment,
}

#[derive(Debug)]
pub struct AssembledTrack {
    pub audio: Vec<u8>,
    pub duration_ms: f64,
}

/// Joins drill patterns and sentences into files via the audio processor
pub struct AudioAssembler {
    audio: Arc<dyn AudioProcessor>,
}

impl AudioAssembler {
    pub fn new(audio: Arc<dyn AudioProcessor>) -> Self {
        Self { audio }
    }

    /// Render both silences once; every sentence reuses them
    pub async fn render_silences(
        &self,
        work_dir: &WorkDir,
        short_secs: f64,
        long_secs: f64,
    ) -> Result<LessonSilences, AudioError> {
        let short = self.render_silence(work_dir, "silence_short.mp3", short_secs).await?;
        let long = self.render_silence(work_dir, "silence_long.mp3", long_secs).await?;
        Ok(LessonSilences { short, long })
    }

    async fn render_silence(
        &self,
        work_dir: &WorkDir,
        name: &str,
        duration_secs: f64,
    ) -> Result<RenderedSegment, AudioError> {
        let bytes = self.audio.make_silence(duration_secs).await?;
        let path = work_dir.write(name, &bytes).await?;
        self.measure(path).await
    }

    /// Concatenate one sentence's 7-segment drill into a single file
    pub async fn assemble_sentence(
        &self,
        work_dir: &WorkDir,
        index: usize,
        clip: &[u8],
        silences: &LessonSilences,
    ) -> Result<RenderedSegment, AudioError> {
        if clip.is_empty() {
            return Err(AudioError::Invalid(format!(
                "sentence {} has no synthesized audio",
                index
            )));
        }

        let clip_path = work_dir.write(&format!("clip_{:04}.mp3", index), clip).await?;
        let segments = build_pattern(&silences.short.path, &clip_path);
        let drill = self.audio.concat(&segments).await?;
        let drill_path = work_dir
            .write(&format!("drill_{:04}.mp3", index), &drill)
            .await?;

        let rendered = self.measure(drill_path).await?;
        tracing::debug!(
            sentence_index = index,
            duration_ms = rendered.duration_ms,
            "Sentence drill assembled"
        );
        Ok(rendered)
    }

    /// Concatenate all drills, in order, separated by the long silence
    pub async fn assemble_track(
        &self,
        work_dir: &WorkDir,
        drills: &[RenderedSegment],
        silences: &LessonSilences,
    ) -> Result<AssembledTrack, AudioError> {
        let drill_paths: Vec<PathBuf> = drills.iter().map(|d| d.path.clone()).collect();
        let segments = build_track(&drill_paths, &silences.long.path);
        let audio = self.audio.concat(&segments).await?;

        let track_path = work_dir.write("lesson.mp3", &audio).await?;
        let duration_ms = self.audio.probe_duration_ms(&track_path).await?;

        Ok(AssembledTrack { audio, duration_ms })
    }

    async fn measure(&self, path: PathBuf) -> Result<RenderedSegment, AudioError> {
        let duration_ms = self.audio.probe_duration_ms(&path).await?;
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(AudioError::MalformedOutput {
                program: "ffprobe".to_string(),
                detail: format!("{} has duration {} ms", path.display(), duration_ms),
            });
        }
        Ok(RenderedSegment { path, duration_ms })
    }
}
