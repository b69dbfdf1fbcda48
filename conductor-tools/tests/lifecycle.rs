//! Server lifecycle over an in-memory transport

use conductor_tools::{serve_transport, ServerConfig, SHUTDOWN_TIMEOUT};
use rmcp::ServiceExt;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[test_log::test(tokio::test)]
async fn cancel_stops_server_within_shutdown_timeout() {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(serve_transport(
        ServerConfig::default(),
        server_io,
        shutdown.clone(),
    ));

    let client = ().serve(client_io).await.unwrap();
    let tools = client.list_all_tools().await.unwrap();
    assert_eq!(tools.len(), 6);

    let started = Instant::now();
    shutdown.cancel();
    let result = tokio::time::timeout(SHUTDOWN_TIMEOUT + Duration::from_secs(1), server)
        .await
        .expect("server outlived the shutdown timeout")
        .unwrap();

    assert!(result.is_ok());
    assert!(started.elapsed() <= SHUTDOWN_TIMEOUT);
}

#[test_log::test(tokio::test)]
async fn client_disconnect_stops_server() {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(serve_transport(
        ServerConfig::default(),
        server_io,
        shutdown.clone(),
    ));

    let client = ().serve(client_io).await.unwrap();
    client.cancel().await.unwrap();

    let result = tokio::time::timeout(SHUTDOWN_TIMEOUT, server)
        .await
        .expect("server kept running after the client left")
        .unwrap();
    assert!(result.is_ok());
    assert!(!shutdown.is_cancelled());
}
