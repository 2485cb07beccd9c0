use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, lesson::LessonController};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;
use crate::infrastructure::repositories::LessonRepository;

/// Build the application router with all routes and layers
pub fn build_router(
    config: &Config,
    lesson_repo: Arc<dyn LessonRepository>,
    lesson_controller: Arc<LessonController>,
) -> Router {
    let lesson_routes = Router::new()
        .route("/api/lessons", post(LessonController::create_lesson))
        .route("/api/lessons/:lessonId", get(LessonController::get_lesson))
        .route(
            "/api/lessons/:lessonId/audio",
            get(LessonController::get_lesson_audio),
        )
        .with_state(lesson_controller);

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(lesson_repo)
        .merge(lesson_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        );

    // The playback page may be served from another origin while developing
    if config.is_development() {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    lesson_repo: Arc<dyn LessonRepository>,
    lesson_controller: Arc<LessonController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config, lesson_repo, lesson_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
