//! HTTP server lifecycle: bind, serve, and shut down on Ctrl+C or SIGTERM

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::app::{build_router, AppState};
use crate::utils::errors::Result;

/// Serve the API until a shutdown signal arrives
pub async fn serve(state: AppState) -> Result<()> {
    let address = state.settings.bind_address();
    let router = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Server listening");

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => info!("Received SIGTERM, starting shutdown"),
    }
}
