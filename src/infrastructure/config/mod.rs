use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Absent means lessons are kept in memory only
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // TTS
    pub tts_provider: TtsProvider,
    pub aws_region: String,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    // Audio processing
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    pub audio_sample_rate: u32,
    pub audio_bitrate: String,
    pub silence_short_secs: f64,
    pub silence_long_secs: f64,
    pub work_dir: PathBuf,
    // Storage
    pub audio_storage_dir: PathBuf,
    // Lessons
    pub lesson_cache_enabled: bool,
    pub max_sentences_per_lesson: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Polly,
    OpenAi,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "polly".to_string())
                .to_lowercase()
                .as_str()
            {
                "polly" => TtsProvider::Polly,
                "openai" => TtsProvider::OpenAi,
                other => return Err(format!("Unknown TTS_PROVIDER: {}", other).into()),
            },
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            ffmpeg_bin: env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_bin: env::var("FFPROBE_BIN").unwrap_or_else(|_| "ffprobe".to_string()),
            audio_sample_rate: env::var("AUDIO_SAMPLE_RATE")
                .unwrap_or_else(|_| "24000".to_string())
                .parse()?,
            audio_bitrate: env::var("AUDIO_BITRATE").unwrap_or_else(|_| "48k".to_string()),
            silence_short_secs: env::var("SILENCE_SHORT_SECS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()?,
            silence_long_secs: env::var("SILENCE_LONG_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,
            work_dir: env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join("lingotape")),
            audio_storage_dir: env::var("AUDIO_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/audio")),
            lesson_cache_enabled: env::var("LESSON_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(true),
            max_sentences_per_lesson: env::var("MAX_SENTENCES_PER_LESSON")
                .unwrap_or_else(|_| "200".to_string())
                .parse()?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Reject settings that would make every generation request fail
    pub fn validate(&self) -> Result<(), String> {
        if self.tts_provider == TtsProvider::OpenAi && self.openai_api_key.is_none() {
            return Err("OPENAI_API_KEY is required when TTS_PROVIDER=openai".to_string());
        }
        if !(self.silence_short_secs > 0.0) || !(self.silence_long_secs > 0.0) {
            return Err("Silence durations must be positive".to_string());
        }
        if self.max_sentences_per_lesson == 0 {
            return Err("MAX_SENTENCES_PER_LESSON must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
