//! Cluster Cache - gateway binary
//!
//! Runs a coordinator and an HTTP gateway worker as members of an in-process
//! group, so the shared cache can be exercised over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cluster_cache::api::create_router;
use cluster_cache::{AppState, Coordinator, CoordinatorConfig, GatewayConfig, HostProcess, LocalGroup};

/// Startup sequence:
/// 1. Initialize tracing subscriber for logging
/// 2. Load coordinator and gateway configuration from environment variables
/// 3. Start the coordinator in the group's coordinator process
/// 4. Attach the gateway to a worker process
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cluster_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cluster Cache");

    let coordinator_config = CoordinatorConfig::from_env();
    let gateway_config = GatewayConfig::from_env();
    info!(
        "Configuration loaded: max_entries={:?}, max_size={:?}, default_ttl_ms={:?}, port={}, request_timeout_ms={}",
        coordinator_config.max_entries,
        coordinator_config.max_size,
        coordinator_config.default_ttl_ms,
        gateway_config.server_port,
        gateway_config.request_timeout_ms
    );

    let group = LocalGroup::new();
    let primary = HostProcess::new(group.coordinator());
    let coordinator = Coordinator::init(&primary, coordinator_config)
        .context("failed to start coordinator")?;

    let gateway = Arc::new(HostProcess::new(group.spawn_worker()));
    info!("Gateway attached as {}", gateway.peer());

    let app = create_router(AppState::new(gateway, coordinator, gateway_config.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], gateway_config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
