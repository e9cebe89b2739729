use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use couples_admin::{api, config::AdminConfig, store::MemoryStore};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "couples_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting couples admin...");

    let config = AdminConfig::from_env();

    let store = match &config.snapshot_path {
        Some(path) if path.exists() => match MemoryStore::load_from_file(path).await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Failed to load catalog snapshot: {}", e);
                std::process::exit(1);
            }
        },
        Some(path) => {
            tracing::info!(
                "No catalog snapshot at {}, starting empty",
                path.display()
            );
            MemoryStore::new()
        }
        None => MemoryStore::new(),
    };

    let state = Arc::new(api::ApiState::new(store.clone(), config.catalog));

    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    if let Some(path) = &config.snapshot_path {
        if let Err(e) = store.save_to_file(path).await {
            tracing::error!("Failed to save catalog snapshot: {}", e);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
