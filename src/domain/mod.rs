pub mod lesson;
pub mod playback;
pub mod tts;
