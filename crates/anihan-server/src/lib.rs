//! REST API for the Anihan marketplace.
//!
//! Serves `/api/v1` over axum with every response wrapped in the
//! `{"success": ..., "data" | "message": ...}` envelope, plus `/health`.
//!
//! # Example
//!
//! ```rust,ignore
//! use anihan_server::{config::ServerConfig, serve};
//!
//! let config = ServerConfig::discover(None)?.with_env()?;
//! serve(config).await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use events::{Action, Event, Events};
pub use routes::router;
pub use state::AppState;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// Open the configured state and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::open(&config).await?;
    let app = router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
