// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the flood predictor
// Usage: cargo run --features api --bin api_server

use flood_risk_rust::{create_router, AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "flood_risk_rust=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let config = AppConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  FLOOD_SCORER: {:?}", config.scorer);
    tracing::info!("  FLOOD_MODEL_PATH: {:?}", config.model_path);
    tracing::info!("  BIND: {}", config.socket_addr());

    // Initialize application state (loads the model artifact when configured)
    let state = AppState::new(&config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
