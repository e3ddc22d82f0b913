use analyzer::IncidentAnalyzer;
use config::Config;
use embedding::impl_clip_onnx::EmbeddingModelClipOnnx;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod analyzer;
mod catalog;
mod config;
mod embedding;
mod error;
mod http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    tracing::info!(?config, "loaded configuration");

    let started = Instant::now();
    let model = EmbeddingModelClipOnnx::new(&config.clip_model_config())?;
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        model = http::MODEL_NAME,
        "embedding model loaded"
    );

    let analyzer = Arc::new(IncidentAnalyzer::new(Arc::new(model)));
    let app = http::routes(analyzer);

    let address = config.bind_address();
    tracing::info!("listening on {address}");
    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
