/*!
 * HTTP surface of the catalog.
 *
 * - `params`: query/path validation into filters and pagination
 * - `handlers`: one async handler per endpoint over a `QuestionStore`
 * - `problem`: error-to-status mapping and problem-details bodies
 * - `routes`: router assembly, CORS, static images, request logging
 */

pub mod handlers;
pub mod params;
pub mod problem;
pub mod routes;

use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;
use tokio::signal;

use crate::app_config::ServerConfig;
use crate::store::QuestionStore;

pub use routes::create_router;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

/// Serve the catalog until Ctrl+C or SIGTERM
pub async fn start_server(config: &ServerConfig, store: Arc<dyn QuestionStore>) -> Result<()> {
    let app = create_router(config, store);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to address {}", bind_address))?;

    info!("Server running on {}", config.server_url());
    info!("Serving images from '{}' under {}", config.images_dir, routes::IMAGES_PREFIX);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated with an error")?;

    info!("Shutting down enem-api server");

    Ok(())
}
