//! Service hub backend entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use service_hub_backend::app::{self, AppContext};
use service_hub_backend::config::Config;
use service_hub_backend::store::Store;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Configuration loaded: {:?}", config);

    let store = Store::open(&config.store.database_path)?;

    // Readiness is probed in the background: a store that cannot come up is
    // logged, while the listener starts regardless and every request touching
    // the store reports its own failure.
    let probe = store.clone();
    let database_path = config.store.database_path.clone();
    tokio::spawn(async move {
        match probe.ensure_ready().await {
            Ok(()) => info!("Document store ready at {database_path}"),
            Err(e) => error!("Document store failed its readiness check: {e}"),
        }
    });

    let ctx = AppContext {
        store: store.clone(),
        config: config.clone(),
    };
    let app = app::router(ctx);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM so the server can drain in-flight requests.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
