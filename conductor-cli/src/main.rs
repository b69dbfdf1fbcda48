use std::process;

mod cli;
mod exit_codes;
mod signal_handler;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, ServeArgs};
use conductor_common::init_logging;
use conductor_tools::{serve_stdio, ServerConfig};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.into_command() {
        Commands::Serve(args) => run_serve(args).await,
    };

    let exit_code = match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };
    process::exit(exit_code);
}

async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    init_logging(args.log_level);

    let config = ServerConfig {
        name: args.name,
        version: conductor_tools::VERSION.to_string(),
        log_level: args.log_level,
    };

    let shutdown = CancellationToken::new();
    let listener = signal_handler::spawn_shutdown_listener(shutdown.clone())
        .context("failed to install signal handlers")?;

    let result = serve_stdio(config, shutdown.clone())
        .await
        .context("MCP server failed to start");

    // Stops the listener when the client disconnected first
    shutdown.cancel();
    if let Err(e) = listener.await {
        tracing::debug!("signal listener ended abnormally: {e}");
    }

    result?;
    tracing::info!("shutdown complete");
    Ok(())
}
