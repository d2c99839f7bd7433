//! User-management service front.
//!
//! # Architecture Overview
//!
//! ```text
//!   config (TOML) ──▶ lifecycle::startup ──▶ routing::TreeBuilder ──▶ RouteTree (frozen)
//!                              │                     │
//!                              │                     ▼
//!                              │              routing::AxumEngine ──▶ axum::Router
//!                              ▼                                          │
//!                       api modules                                       ▼
//!                  (discovery, system)             http::HttpServer (trace, timeout, request id)
//!                                                                         │
//!                                                                         ▼
//!                                                                 TcpListener / clients
//! ```
//!
//! Startup is fail-fast: a tree that cannot be assembled never serves.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use usermanager::config::{load_config, ServiceConfig};
use usermanager::http::HttpServer;
use usermanager::lifecycle::{assemble, signals, Shutdown};
use usermanager::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "usermanager")]
#[command(about = "User-management HTTP service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Assemble the route tree, print every endpoint and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "usermanager starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let assembly = match assemble(&config) {
        Ok(assembly) => assembly,
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            return Err(e.into());
        }
    };

    if args.check {
        for path in assembly.tree.collect_leaf_paths() {
            println!("{}", path);
        }
        return Ok(());
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    HttpServer::new(config, assembly)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
