//! Country lookup SOAP service.
//!
//! # Architecture Overview
//!
//! ```text
//!     SOAP client ──POST /services──▶ http server ──▶ endpoint ──▶ country repository
//!                                        │
//!                                        ├── GET /services/countries.wsdl
//!                                        └── GET /health
//!
//!     Cross-cutting: config, observability (tracing, metrics), lifecycle (signals, shutdown)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use country_ws::config::{load_config, ServiceConfig};
use country_ws::lifecycle::{signals, Shutdown};
use country_ws::observability::{logging, metrics};
use country_ws::{CountryRepository, HttpServer};

#[derive(Parser)]
#[command(name = "country-ws")]
#[command(about = "Country lookup SOAP service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_filter)?;
    tracing::info!("country-ws v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let repository = Arc::new(CountryRepository::seeded());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, repository);
    server.run(listener, shutdown.clone()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
