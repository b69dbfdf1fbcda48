use clap::{Args, Parser, Subcommand};
use conductor_common::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(version)]
#[command(about = "Workflow tools for AI assistants over MCP")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "
conductor serves workflow validation, schema introspection, template
scaffolding, dry-run planning and health checks as MCP tools on stdin/stdout.

Example usage:
  conductor serve                      # Run as MCP server
  conductor serve --log-level debug    # Log every dispatch to stderr
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments used when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,
}

impl Cli {
    /// The command to run; `serve` when none was given
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve(self.serve))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server on stdio (default)
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// Server name advertised to clients
    #[arg(long, default_value = "conductor")]
    pub name: String,

    /// Minimum log level written to stderr
    #[arg(
        long,
        env = "CONDUCTOR_LOG_LEVEL",
        default_value = "info",
        value_parser = parse_log_level
    )]
    pub log_level: LogLevel,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    value.parse().map_err(|e: conductor_common::ConductorError| e.to_string())
}
