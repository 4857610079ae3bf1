use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use moodtune::application::ports::{AudioTranscoder, LlmClient, StagingStore};
use moodtune::application::services::{MoodService, SongService};
use moodtune::infrastructure::audio::{FfmpegTranscoder, TranscriptionEngineFactory};
use moodtune::infrastructure::llm::GeminiClient;
use moodtune::infrastructure::observability::init_tracing;
use moodtune::infrastructure::storage::LocalStagingStore;
use moodtune::presentation::config::API_KEY_VARIABLE;
use moodtune::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&settings.logging, environment);

    if settings.llm.api_key.is_empty() {
        tracing::warn!(
            variable = API_KEY_VARIABLE,
            "No Gemini API key configured; mood detection will report Unknown"
        );
    }

    let staging_store: Arc<dyn StagingStore> = Arc::new(
        LocalStagingStore::new(PathBuf::from(&settings.storage.staging_dir))
            .context("Failed to prepare staging directory")?,
    );

    let ffmpeg = FfmpegTranscoder::new(settings.transcoder.ffmpeg_binary.clone());
    if let Err(e) = ffmpeg.check_binary().await {
        tracing::warn!(error = %e, "ffmpeg unavailable; voice input will report Unknown");
    }
    let transcoder: Arc<dyn AudioTranscoder> = Arc::new(ffmpeg);

    let transcription_engine = TranscriptionEngineFactory::create(&settings.speech).await;

    let llm_client: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(
        settings.llm.api_key.clone(),
        settings.llm.base_url.clone(),
        settings.llm.model.clone(),
    ));

    let mood_service = Arc::new(MoodService::new(
        transcoder,
        transcription_engine,
        Arc::clone(&llm_client),
        Arc::clone(&staging_store),
    ));
    let song_service = Arc::new(SongService::new(llm_client));

    let state = AppState {
        mood_service,
        song_service,
        staging_store,
        max_upload_size_bytes: settings.storage.max_upload_size_bytes,
    };

    let router = create_router(state);

    let ip = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host: {}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
