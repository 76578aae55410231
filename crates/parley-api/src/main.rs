//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, loads configuration, then either prints it or
//! starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use parley_infra::config::load_config;
use parley_infra::filesystem::resolve_data_dir;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither tracing nor config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    parley_observe::tracing_setup::init_tracing(cli.log_directive(), cli.json, otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;

    match cli.command {
        Commands::Config => {
            cli::config::show_config(&config, &data_dir, cli.json)?;
        }

        Commands::Serve { port, host, .. } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::init(config, data_dir).await?;
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                provider = state.chat_service.provider_name(),
                model = %state.config.llm.model,
                "Parley API listening"
            );
            if !cli.quiet {
                println!(
                    "  {} Parley listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    parley_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
