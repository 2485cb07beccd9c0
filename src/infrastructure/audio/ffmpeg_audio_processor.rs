use super::audio_processor::{AudioError, AudioProcessor};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use uuid::Uuid;

/// Audio processor backed by the `ffmpeg` and `ffprobe` binaries
pub struct FfmpegAudioProcessor {
    ffmpeg_bin: String,
    ffprobe_bin: String,
    sample_rate: u32,
    bitrate: String,
}

impl FfmpegAudioProcessor {
    pub fn new(ffmpeg_bin: String, ffprobe_bin: String, sample_rate: u32, bitrate: String) -> Self {
        Self {
            ffmpeg_bin,
            ffprobe_bin,
            sample_rate,
            bitrate,
        }
    }

    fn silence_args(&self, duration_secs: f64) -> Vec<OsString> {
        [
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            format!("anullsrc=r={}:cl=mono", self.sample_rate),
            "-t".to_string(),
            format!("{:.3}", duration_secs),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            self.bitrate.clone(),
            "-f".to_string(),
            "mp3".to_string(),
            "pipe:1".to_string(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect()
    }

    async fn run(&self, program: &str, args: &[OsString]) -> Result<Vec<u8>, AudioError> {
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AudioError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                program,
                status = %output.status,
                stderr = %stderr,
                "Audio tool failed"
            );
            return Err(AudioError::Failed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(output.stdout)
    }
}

/// Build an ffmpeg concat-demuxer list, one `file '<path>'` line per segment
fn concat_list(segments: &[PathBuf]) -> String {
    segments
        .iter()
        .map(|path| {
            let escaped = path.to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", escaped)
        })
        .collect()
}

/// Parse `ffprobe -show_entries format=duration` output (seconds) into milliseconds
fn parse_duration_ms(program: &str, stdout: &[u8]) -> Result<f64, AudioError> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    let seconds: f64 = trimmed.parse().map_err(|_| AudioError::MalformedOutput {
        program: program.to_string(),
        detail: format!("expected a duration, got {:?}", trimmed),
    })?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AudioError::MalformedOutput {
            program: program.to_string(),
            detail: format!("invalid duration {}", seconds),
        });
    }
    Ok(seconds * 1000.0)
}

#[async_trait]
impl AudioProcessor for FfmpegAudioProcessor {
    async fn make_silence(&self, duration_secs: f64) -> Result<Vec<u8>, AudioError> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(AudioError::Invalid(format!(
                "silence duration must be positive, got {}",
                duration_secs
            )));
        }

        let audio = self
            .run(&self.ffmpeg_bin, &self.silence_args(duration_secs))
            .await?;
        if audio.is_empty() {
            return Err(AudioError::MalformedOutput {
                program: self.ffmpeg_bin.clone(),
                detail: "silence render produced no audio".to_string(),
            });
        }

        tracing::debug!(duration_secs, size = audio.len(), "Silence rendered");
        Ok(audio)
    }

    async fn concat(&self, segments: &[PathBuf]) -> Result<Vec<u8>, AudioError> {
        let first = segments
            .first()
            .ok_or_else(|| AudioError::Invalid("nothing to concatenate".to_string()))?;
        let list_dir = first.parent().unwrap_or_else(|| Path::new("."));
        let list_path = list_dir.join(format!("concat-{}.txt", Uuid::new_v4()));
        tokio::fs::write(&list_path, concat_list(segments)).await?;

        let args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list_path.clone().into_os_string(),
            "-c".into(),
            "copy".into(),
            "-f".into(),
            "mp3".into(),
            "pipe:1".into(),
        ];
        let result = self.run(&self.ffmpeg_bin, &args).await;

        if let Err(e) = tokio::fs::remove_file(&list_path).await {
            tracing::debug!(error = %e, path = %list_path.display(), "Could not remove concat list");
        }

        let audio = result?;
        if audio.is_empty() {
            return Err(AudioError::MalformedOutput {
                program: self.ffmpeg_bin.clone(),
                detail: "concatenation produced no audio".to_string(),
            });
        }

        tracing::debug!(
            segment_count = segments.len(),
            size = audio.len(),
            "Segments concatenated"
        );
        Ok(audio)
    }

    async fn probe_duration_ms(&self, path: &Path) -> Result<f64, AudioError> {
        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-show_entries".into(),
            "format=duration".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            path.as_os_str().to_os_string(),
        ];
        let stdout = self.run(&self.ffprobe_bin, &args).await?;
        parse_duration_ms(&self.ffprobe_bin, &stdout)
    }
}
