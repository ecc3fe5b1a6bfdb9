// markpad relay entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use markpad_relay::{build_router, config::RelayConfig, Relay};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "markpad-relay", about = "Real-time collaborative markdown relay")]
struct Cli {
    /// Path to a TOML config file (defaults to ~/.markpad/relay.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding config and environment.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding config and environment.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RelayConfig::load(cli.config.as_deref())
        .context("failed to load relay configuration")?
        .with_listen_overrides(cli.host.as_deref(), cli.port);

    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&config.log_filter)).init();

    let app = build_router(Relay::from_config(&config), &config);
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind relay listener on {}", config.listen_addr))?;

    info!(listen_addr = %config.listen_addr, "starting relay server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("relay server exited unexpectedly")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
