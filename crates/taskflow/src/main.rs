//! TaskFlow HTTP server entry point.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskflow_app::ServerConfig;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod http;

/// Task and comment JSON API.
#[derive(Parser, Debug)]
#[command(name = "taskflow", version, about = "TaskFlow: tasks, comments and analytics over HTTP")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve {
        /// TOML config file (defaults to ./taskflow.toml when present).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Interface to bind, overriding config and environment.
        #[arg(long)]
        host: Option<IpAddr>,
        /// Port to bind, overriding config and environment.
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let Cli { cmd } = Cli::parse();
    match cmd {
        Command::Serve { config, host, port } => {
            let mut settings = ServerConfig::load(config.as_deref())?;
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            install_tracing(&settings.log_level);
            tokio::runtime::Runtime::new()?.block_on(serve(settings))
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, environment = %config.environment, "taskflow listening");

    let app = http::router(http::AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("taskflow stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = until_signal("Ctrl-C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}

/// Resolve once `listener` reports the signal. A listener that fails to
/// install never resolves, so the server keeps running.
async fn until_signal(name: &str, listener: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = listener.await {
        error!("failed to listen for {name}: {err}");
        std::future::pending::<()>().await;
    }
}

fn install_tracing(level: &str) {
    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
