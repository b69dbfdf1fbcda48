//! Transport lifecycle
//!
//! The server runs until the client closes its side or `shutdown` is
//! cancelled. After a cancel the service gets [`SHUTDOWN_TIMEOUT`] to wind
//! down.

use super::server::{McpServer, ServerConfig};
use conductor_common::ConductorError;
use rmcp::transport::io::stdio;
use rmcp::transport::IntoTransport;
use rmcp::{RoleServer, ServiceExt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Grace period between a shutdown request and giving up on the service
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve MCP over stdin/stdout
///
/// Fails only when the server cannot be built or the protocol handshake
/// fails; errors after that are logged.
pub async fn serve_stdio(
    config: ServerConfig,
    shutdown: CancellationToken,
) -> conductor_common::Result<()> {
    serve_transport(config, stdio(), shutdown).await
}

/// Serve MCP over any rmcp transport
pub async fn serve_transport<T, E, A>(
    config: ServerConfig,
    transport: T,
    shutdown: CancellationToken,
) -> conductor_common::Result<()>
where
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
{
    let server = McpServer::new(config)?;
    tracing::info!(
        name = %server.config().name,
        version = %server.config().version,
        "starting MCP server"
    );

    let running = server
        .serve_with_ct(transport, shutdown.child_token())
        .await
        .map_err(|e| ConductorError::internal(format!("failed to start MCP server: {e}")))?;

    let waiting = running.waiting();
    tokio::pin!(waiting);

    tokio::select! {
        result = &mut waiting => match result {
            Ok(reason) => tracing::info!("MCP server stopped: {reason:?}"),
            Err(e) => tracing::error!("MCP server task failed: {e}"),
        },
        _ = shutdown.cancelled() => {
            tracing::info!("shutdown requested");
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut waiting).await {
                Ok(Ok(reason)) => tracing::info!("MCP server stopped: {reason:?}"),
                Ok(Err(e)) => tracing::error!("MCP server task failed during shutdown: {e}"),
                Err(_) => tracing::error!(
                    "MCP server did not stop within {}s",
                    SHUTDOWN_TIMEOUT.as_secs()
                ),
            }
        }
    }

    Ok(())
}
