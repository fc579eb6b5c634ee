//! repomig - Fedora 3.4 → Islandora migration service
//!
//! `repomig serve` exposes the migration endpoint over HTTP.
//! `repomig migrate <PID>` runs one oral-history migration and prints the report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repomig_common::config::{ConfigOverrides, TomlConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;

use repomig::clients::{FedoraSourceClient, IslandoraTargetClient};
use repomig::policy::{Migrator, OralHistoryPolicy};
use repomig::AppState;

/// Command-line arguments for repomig
#[derive(Parser, Debug)]
#[command(name = "repomig")]
#[command(about = "Migrates Fedora 3.4 objects into Islandora")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, global = true, env = "REPOMIG_CONFIG")]
    config: Option<PathBuf>,

    /// Namespace for newly created objects
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Socket address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Migrate one object as an oral history and print the report
    Migrate {
        /// Pid of the source object
        pid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (subscriber, log_filter) = repomig::logging::subscriber(std::io::stdout);
    subscriber.init();

    let overrides = ConfigOverrides {
        config_path: args.config.clone(),
        bind: match &args.command {
            Command::Serve { bind } => bind.clone(),
            Command::Migrate { .. } => None,
        },
        namespace: args.namespace.clone(),
    };

    let config = TomlConfig::resolve(&overrides).context("Failed to load configuration")?;
    log_filter
        .apply_level(&config.logging.level)
        .context("Failed to apply configured log level")?;

    info!("Starting repomig v{}", env!("CARGO_PKG_VERSION"));
    info!("Source repository: {}", config.source.base_url);
    info!("Target repository: {}", config.target.base_url);
    info!("Namespace: {}", config.migration.namespace);

    let migrator = build_migrator(&config)?;

    match args.command {
        Command::Serve { .. } => serve(&config, migrator).await,
        Command::Migrate { pid } => {
            let report = migrator
                .run(&OralHistoryPolicy, &pid)
                .await
                .with_context(|| format!("Failed to migrate {pid}"))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn build_migrator(config: &TomlConfig) -> Result<Migrator> {
    let timeout = config.migration.request_timeout_secs.map(Duration::from_secs);

    let source = FedoraSourceClient::new(&config.source, timeout)
        .context("Failed to create source repository client")?;
    let target = IslandoraTargetClient::new(&config.target, timeout)
        .context("Failed to create target repository client")?;

    Ok(Migrator::new(
        Arc::new(source),
        Arc::new(target),
        config.migration.namespace.clone(),
    ))
}

async fn serve(config: &TomlConfig, migrator: Migrator) -> Result<()> {
    let app = repomig::build_router(AppState::new(migrator));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;
    info!("Listening on http://{}", config.server.bind);
    info!("Health check: http://{}/health", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
