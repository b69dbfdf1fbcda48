//! Signal-driven shutdown

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel `shutdown` on SIGINT or SIGTERM
///
/// Handlers are installed before this returns, so a signal that arrives
/// while the server is starting is not lost.
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
            _ = shutdown.cancelled() => return,
        }
        shutdown.cancel();
    }))
}

/// Cancel `shutdown` on ctrl-c
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(shutdown: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("failed to listen for ctrl-c: {e}");
                    return;
                }
                tracing::info!("received ctrl-c, shutting down");
            }
            _ = shutdown.cancelled() => return,
        }
        shutdown.cancel();
    }))
}
