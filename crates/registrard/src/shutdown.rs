//! Serving until shutdown
//!
//! [`serve_until`] runs the router until the shutdown future resolves and
//! reports how it ended. A shutdown future that fails (e.g. signal handlers
//! could not be installed) still stops the server, but the failure is
//! returned instead of being reported as a clean shutdown.

use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Serve `app` on `listener` until `shutdown` resolves
///
/// # Returns
///
/// - `Ok(name)`: graceful shutdown after the signal `name`
/// - `Err`: the server failed, or `shutdown` failed
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<&'static str>
where
    F: Future<Output = Result<&'static str>> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Receiver outlives the server; a failed send only means serve() already errored
            let _ = tx.send(shutdown.await);
        })
        .await
        .context("HTTP server failed")?;

    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => anyhow::bail!("HTTP server stopped without a shutdown signal"),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
pub async fn wait_for_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    async fn listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").await.unwrap()
    }

    #[tokio::test]
    async fn clean_shutdown_reports_signal() {
        let app = Router::new().route("/healthz", get(|| async {}));

        let outcome = serve_until(listener().await, app, async { Ok("SIGTERM") }).await;
        assert_eq!(outcome.unwrap(), "SIGTERM");
    }

    #[tokio::test]
    async fn failed_signal_setup_is_an_error() {
        let outcome = serve_until(listener().await, Router::new(), async {
            Err(anyhow::anyhow!("Failed to setup SIGTERM handler: unsupported"))
        })
        .await;

        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("SIGTERM handler"));
    }
}
