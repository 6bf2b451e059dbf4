//! Boardgen server binary.

use std::process;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use boardgen::config::{self, Config};
use boardgen::context::ServiceContext;
use boardgen::error::BoardError;
use boardgen::model::parse_backend;
use boardgen::server::{create_router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), BoardError> {
    // Local .env, if any, before reading the process environment
    let _ = dotenvy::dotenv();

    let config_path = config::discover_config_path();
    let config = Config::load(&config_path).map_err(BoardError::Config)?;

    let backend = parse_backend(&config.backend()).map_err(BoardError::Config)?;
    tracing::info!(?backend, "selected image backend");

    // A missing credential is fatal here, before the listener binds —
    // never a per-request error.
    let context = ServiceContext::live(backend, &config)?;
    let app = create_router(AppState { context });

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| BoardError::Config(format!("Failed to bind {bind_addr}: {e}")))?;
    tracing::info!("boardgen listening on http://{bind_addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| BoardError::Config(format!("Server error: {e}")))
}
