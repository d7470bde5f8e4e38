//! Manga Content Gateway
//!
//! Forwards every request to the content API and fails over between
//! backends without the browser noticing.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                    GATEWAY                       │
//!   Browser / pages     │  ┌─────────┐   ┌─────────────┐   ┌────────────┐  │
//!   ────────────────────┼─▶│  http   │──▶│ resilience  │──▶│  upstream  │──┼──▶ primary
//!                       │  │ capture │   │ Attempt1/2  │   │ forwarder  │──┼──▶ secondary (tunnel)
//!   ◀───────────────────┼──│translate│◀──│ Exhausted   │◀──│            │──┼──▶ local (dev only)
//!                       │  └─────────┘   └──────┬──────┘   └────────────┘  │
//!                       │                       │ FailoverState            │
//!                       │  config · observability · admin · lifecycle      │
//!                       └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use manga_gateway::config::{load_config, watcher::ConfigWatcher};
use manga_gateway::http::GatewayServer;
use manga_gateway::lifecycle::{signals, Shutdown};
use manga_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "manga-gateway", version)]
#[command(about = "Failover gateway in front of the manga content API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Reload upstream URLs and mode when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!("manga-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = config.mode.as_str(),
        primary = %config.upstreams.primary_url,
        secondary = %config.upstreams.secondary_url,
        local = %config.upstreams.local_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = GatewayServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
