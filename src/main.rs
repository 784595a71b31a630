//! Upstream-forwarding relay daemon.
//!
//! Accepts HTTP requests, rebuilds each one against the configured
//! upstream, executes it with bounded retries and per-attempt deadlines,
//! and relays the upstream response back to the caller. Failures that
//! survive the retry loop are answered with 502/504 here, at the edge.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use relay_proxy::config::loader::load_config;
use relay_proxy::lifecycle::{shutdown_signal, Shutdown};
use relay_proxy::observability::{logging, metrics};
use relay_proxy::{RelayConfig, RelayServer};

#[derive(Parser)]
#[command(name = "relay-proxy")]
#[command(about = "Upstream-forwarding relay with retries and deadlines", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.label(),
        attempts = config.forward.attempts,
        timeout_secs = config.forward.timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = RelayServer::new(config);
    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
