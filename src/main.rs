//! X-Clacks-Overhead tribute service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!   Request  ────▶│ request id → trace → tribute hook → timeout → router │
//!                 │                         │                    │       │
//!                 │                         │          ┌─────────┴──────┐│
//!                 │                         │          │ pages / login  ││
//!                 │                         │          │ REST / admin   ││
//!                 │                         │          └─────────┬──────┘│
//!   Response ◀────│◀── X-Clacks-Overhead ◀──┘◀───────────────────┘       │
//!                 │                                                      │
//!                 │   option store (JSON file, ArcSwap cache, watcher)   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use clacks_overhead::config::{load_config, AppConfig};
use clacks_overhead::lifecycle::{shutdown_on_signal, Shutdown};
use clacks_overhead::observability::init_logging;
use clacks_overhead::HttpServer;

#[derive(Parser)]
#[command(name = "clacks-overhead")]
#[command(about = "Serve a site that keeps names alive in the clacks", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "CLACKS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    init_logging(&config.observability);

    tracing::info!("clacks-overhead v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage = ?config.storage.path,
        admin_enabled = config.admin.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    let settings = server.store().load();
    tracing::info!(
        enabled = settings.enabled,
        send_hex = settings.send_hex,
        message = %settings.message,
        "Tribute settings loaded"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
