use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("malformed output from {program}: {detail}")]
    MalformedOutput { program: String, detail: String },
    #[error("invalid audio request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// External audio-processing capability used to assemble lessons.
///
/// All operations are stream-level: `concat` joins already-encoded
/// segments without re-encoding, so measured durations of the inputs
/// add up to the duration of the output.
#[async_trait]
pub trait AudioProcessor: Send + Sync {
    /// Render `duration_secs` of silence in the lesson's audio format
    async fn make_silence(&self, duration_secs: f64) -> Result<Vec<u8>, AudioError>;

    /// Join the segments in exactly the given order
    async fn concat(&self, segments: &[PathBuf]) -> Result<Vec<u8>, AudioError>;

    /// Measure the duration of a rendered file in milliseconds
    async fn probe_duration_ms(&self, path: &Path) -> Result<f64, AudioError>;
}
