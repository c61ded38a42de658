use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use vitali::{
    AppState, Hub, JsonFileStore, Settings,
    advice::{AdviceGateway, GeminiClient},
    router,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();
    let storage = Arc::new(JsonFileStore::new(&settings.data_dir));
    let hub = Hub::boot(storage).await?;

    if settings.advice.api_key.is_none() {
        info!("GEMINI_API_KEY not set, coach answers will use the fallback text");
    }
    let advice = AdviceGateway::new(Arc::new(GeminiClient::new(&settings.advice)));
    let app = router(AppState::new(hub, advice));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(data_dir = %settings.data_dir.display(), "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
