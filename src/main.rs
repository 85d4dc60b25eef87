//! respcache - A single-node in-memory cache over a RESP-style wire protocol
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Create the shared cache store
//! 4. Bind the wire protocol listener
//! 5. Optionally start the HTTP codec facade
//! 6. Run until SIGINT/SIGTERM

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use respcache::api::{create_router, AppState};
use respcache::cache::{shared, CacheStore};
use respcache::{Config, Listener};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "respcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting respcache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, resp_port={}, http_port={}, max_connections={}",
        config.cache_capacity, config.resp_port, config.http_port, config.max_connections
    );

    // One cache for the whole process, shared by both front ends
    let cache = shared(CacheStore::new(config.cache_capacity));

    let resp_addr = SocketAddr::from(([0, 0, 0, 0], config.resp_port));
    let listener = Listener::bind(
        resp_addr,
        cache.clone(),
        config.max_connections,
        config.connection_settings(),
    )
    .await
    .with_context(|| format!("failed to bind wire protocol port {}", resp_addr))?;

    let http = if config.http_enabled {
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
        let http_listener = tokio::net::TcpListener::bind(http_addr)
            .await
            .with_context(|| format!("failed to bind HTTP port {}", http_addr))?;
        info!("HTTP facade listening on http://{}", http_addr);

        let app = create_router(AppState::new(cache.clone()));
        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(http_listener, app).await {
                error!(error = %e, "HTTP facade stopped");
            }
        }))
    } else {
        None
    };

    tokio::select! {
        result = listener.run() => result?,
        _ = shutdown_signal() => {}
    }

    if let Some(handle) = http {
        handle.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
