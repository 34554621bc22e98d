use signet_service::{build_router, config::Config, state::AppState};
use signet_store::{FilesystemRasterStore, RasterStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    tracing::info!("Starting signature service...");

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    // Initialize storage
    let store = FilesystemRasterStore::new(&config.storage.path)
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;
    tracing::info!(
        "Signature slot at {}",
        store.location(store.slot())
    );
    let store: Arc<dyn RasterStore> = Arc::new(store);

    // Build router
    let app_state = AppState::new(store, config.clone());
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Signature service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  / (capture page)");
    tracing::info!("  - POST /save_canvas");
    tracing::info!("  - GET  /retrieve_canvas");
    tracing::info!("  - GET  /download_canvas");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,signet_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
