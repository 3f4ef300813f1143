use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use container_telemetry_service::{
    api,
    config::{Config, StorageBackend},
    db,
    store::{MemoryReadingStore, PgReadingStore, SharedStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent; env vars may be set externally)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store = open_store(&config.storage).await?;

    let app = api::router(store)
        .layer(api::cors_layer(&config.cors_allowed_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn open_store(storage: &StorageBackend) -> Result<SharedStore> {
    match storage {
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = db::create_pool(database_url, *max_connections).await?;
            db::run_migrations(&pool).await?;
            info!(max_connections, "Database ready");
            Ok(Arc::new(PgReadingStore::new(pool)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory reading store; data will not survive a restart");
            Ok(Arc::new(MemoryReadingStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
