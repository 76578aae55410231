//! CLI command definitions for the `parley` binary.

pub mod config;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Session-oriented chat relay for local and hosted language models.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Export tracing spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Print the resolved configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Default tracing directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn,parley=info",
            1 => "info,parley=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["parley", "serve", "--port", "8080", "--otel"]);
        match cli.command {
            Commands::Serve { port, host, otel } => {
                assert_eq!(port, Some(8080));
                assert!(host.is_none());
                assert!(otel);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_log_directive() {
        assert_eq!(Cli::parse_from(["parley", "config"]).log_directive(), "warn,parley=info");
        assert_eq!(Cli::parse_from(["parley", "-v", "config"]).log_directive(), "info,parley=debug");
        assert_eq!(Cli::parse_from(["parley", "--quiet", "config"]).log_directive(), "error");
    }
}
