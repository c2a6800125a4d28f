//! channel-relay server entry point.
//!
//! Loads the channel list, starts one fan-out pump per channel and serves
//! WebSocket and status endpoints until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use channel_relay::app_state::AppState;
use channel_relay::config::{RelayConfig, load_channels};
use channel_relay::server;

/// Multi-channel WebSocket relay.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Channel list file, one channel per line.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to listen on; overrides `LISTEN_ADDR`.
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = RelayConfig::from_env().context("invalid environment configuration")?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    init_tracing(config.log_json);

    let Some(channels_file) = args.config.or_else(|| config.channels_file.clone()) else {
        bail!("no channel list given; pass -c <FILE> or set CHANNELS_FILE");
    };
    let channels = load_channels(&channels_file)
        .with_context(|| format!("failed to load channels from {}", channels_file.display()))?;
    tracing::info!(
        file = %channels_file.display(),
        channels = channels.len(),
        "channel list loaded"
    );

    let state = AppState::bootstrap(&config, &channels)
        .await
        .context("failed to start relay")?;

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    server::serve(listener, state, shutdown_signal()).await?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
