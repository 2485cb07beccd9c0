use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use lingotape_backend::controllers::lesson::LessonController;
use lingotape_backend::domain::lesson::{GenerationSettings, LessonGenerator, LessonService};
use lingotape_backend::infrastructure::audio::{AudioProcessor, FfmpegAudioProcessor};
use lingotape_backend::infrastructure::config::{Config, LogFormat, TtsProvider};
use lingotape_backend::infrastructure::db::{check_connection, create_pool};
use lingotape_backend::infrastructure::http::start_http_server;
use lingotape_backend::infrastructure::repositories::{
    InMemoryLessonRepository, LessonRepository, OpenAiTtsRepository, PgLessonRepository,
    PollyTtsRepository, TtsRepository,
};
use lingotape_backend::infrastructure::storage::{AudioStore, LocalAudioStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting LingoTape Backend on {}:{}",
        config.host,
        config.port
    );

    // Lesson storage: Postgres when configured, otherwise process memory
    let lesson_repo: Arc<dyn LessonRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgLessonRepository::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, lessons are kept in memory only");
            Arc::new(InMemoryLessonRepository::new())
        }
    };

    let tts_repo = build_tts_repository(&config).await;

    let audio_processor: Arc<dyn AudioProcessor> = Arc::new(FfmpegAudioProcessor::new(
        config.ffmpeg_bin.clone(),
        config.ffprobe_bin.clone(),
        config.audio_sample_rate,
        config.audio_bitrate.clone(),
    ));

    tokio::fs::create_dir_all(&config.work_dir).await?;
    tokio::fs::create_dir_all(&config.audio_storage_dir).await?;
    let audio_store: Arc<dyn AudioStore> =
        Arc::new(LocalAudioStore::new(config.audio_storage_dir.clone()));
    tracing::info!(
        work_dir = %config.work_dir.display(),
        audio_storage_dir = %config.audio_storage_dir.display(),
        "Audio directories ready"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    tracing::info!("Instantiating services...");
    let generator = LessonGenerator::new(
        tts_repo,
        audio_processor,
        GenerationSettings {
            silence_short_secs: config.silence_short_secs,
            silence_long_secs: config.silence_long_secs,
            work_root: config.work_dir.clone(),
        },
    );
    let lesson_service = Arc::new(LessonService::new(
        generator,
        lesson_repo.clone(),
        audio_store,
        config.lesson_cache_enabled,
        config.max_sentences_per_lesson,
    ));

    tracing::info!("Instantiating controllers...");
    let lesson_controller = Arc::new(LessonController::new(lesson_service));

    // Start HTTP server with all routes
    start_http_server(config, lesson_repo, lesson_controller).await?;

    Ok(())
}

async fn build_tts_repository(config: &Config) -> Arc<dyn TtsRepository> {
    match config.tts_provider {
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Arc::new(PollyTtsRepository::new(polly_client, config.audio_sample_rate))
        }
        TtsProvider::OpenAi => {
            tracing::info!(model = %config.openai_tts_model, "Initializing OpenAI TTS client");

            let mut openai_config = async_openai::config::OpenAIConfig::new();
            if let Some(api_key) = &config.openai_api_key {
                openai_config = openai_config.with_api_key(api_key.clone());
            }
            let client = Arc::new(async_openai::Client::with_config(openai_config));
            Arc::new(OpenAiTtsRepository::new(
                client,
                config.openai_api_key.is_some(),
                config.openai_tts_model.clone(),
            ))
        }
    }
}

fn init_logging(config: &Config) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "lingotape_backend=debug,tower_http=debug".into())
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
