pub mod audio_processor;
pub mod ffmpeg_audio_processor;
pub mod work_dir;

pub use audio_processor::{AudioError, AudioProcessor};
pub use ffmpeg_audio_processor::FfmpegAudioProcessor;
pub use work_dir::WorkDir;
