use std::net::SocketAddr;
use axum::Router;
use log::info;
use thiserror::Error;
use tokio::net::TcpListener;
use crate::config::Server;

/// Binds the configured address and serves the router until Ctrl+C or SIGTERM
///
/// # Arguments
///
/// * 'config' - server configuration
/// * 'router' - the router to serve
pub async fn serve(config: &Server, router: Router) -> Result<(), ServerError> {
    let addr = SocketAddr::new(config.bind_address, config.port);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindError(format!("{}: {}", addr, e)))?;

    info!("listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::ServeError(e.to_string()))?;

    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => { signal.recv().await; },
            Err(e) => {
                log::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Error depicting errors that occur while running the http server
///
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("BindError: {0}")]
    BindError(String),
    #[error("ServeError: {0}")]
    ServeError(String),
}
