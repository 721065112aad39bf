use std::path::PathBuf;

use clap::{Parser, Subcommand};

use country_ws::config::{load_config, ServiceConfig};
use country_ws::observability::logging;
use country_ws::CountryClient;

#[derive(Parser)]
#[command(name = "country-cli")]
#[command(about = "Query the country lookup SOAP service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; only its `[client]` and `[observability]` sections are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service endpoint, e.g. http://localhost:8080/services.
    #[arg(short, long)]
    endpoint: Option<String>,

    #[arg(long)]
    connect_timeout_ms: Option<u64>,

    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Leave response bodies out of the message log.
    #[arg(long)]
    no_response_body: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a country by exact name
    Get { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        config.client.endpoint = endpoint;
    }
    if let Some(ms) = cli.connect_timeout_ms {
        config.client.connect_timeout_ms = ms;
    }
    if let Some(ms) = cli.read_timeout_ms {
        config.client.read_timeout_ms = ms;
    }
    if cli.no_response_body {
        config.client.log_response_body = false;
    }

    logging::init_cli_logging(&config.observability.log_filter)?;

    let client = CountryClient::from_config(&config.client)?;

    match cli.command {
        Commands::Get { name } => {
            let country = client.get_country(&name).await?;
            println!("{}", serde_json::to_string_pretty(&country)?);
        }
    }

    Ok(())
}
