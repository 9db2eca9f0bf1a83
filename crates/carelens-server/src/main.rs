use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use carelens_bedrock::BedrockGenerator;
use carelens_server::config::ServiceConfig;
use carelens_server::orchestrator::{Capabilities, Orchestrator};
use carelens_server::sessions::{SessionStore, spawn_sweeper};
use carelens_server::state::AppState;
use carelens_transcribe::TranscribeClient;
use carelens_vision::TesseractExtractor;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServiceConfig::load()?;
    let sdk_config = carelens_bedrock::load_sdk_config(&config.region).await;

    let capabilities = Capabilities {
        extractor: Arc::new(TesseractExtractor::new(
            &config.tesseract_bin,
            &config.tesseract_lang,
        )),
        transcriber: Arc::new(TranscribeClient::new(&sdk_config, &config.staging_bucket)),
        generator: Arc::new(BedrockGenerator::new(&sdk_config, &config.model_id)),
    };

    let sessions = Arc::new(SessionStore::new(
        config.window_size,
        config.max_sessions,
        config.session_idle(),
    ));
    let sweeper = spawn_sweeper(Arc::clone(&sessions), config.sweep_interval());

    let orchestrator = Orchestrator::new(&config, capabilities, sessions)?;
    let app = carelens_server::router(AppState::new(orchestrator), &config);

    let listener = TcpListener::bind(&config.bind).await?;
    info!(
        bind = %config.bind,
        region = %config.region,
        model = %config.model_id,
        window_size = config.window_size,
        "carelens listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    sweeper.abort();
    Ok(())
}
