//! Edge relay.
//!
//! Receives HTTP requests at the edge and forwards each one, unchanged apart
//! from forwarding headers, to a single origin reachable through a tunnel.
//!
//! ```text
//!     Client ──▶ edge-relay ──▶ tunnel ──▶ Origin
//!            ◀── status, headers, cookies, redirects, body ──
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_relay::config::{load_config, validation::validate_config, ConfigError, RelayConfig};
use edge_relay::observability::{logging, metrics};
use edge_relay::{RelayServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-relay")]
#[command(about = "Forward every inbound HTTP request to a single origin", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Origin base URL; overrides the environment binding and the file.
    #[arg(short, long)]
    origin: Option<String>,

    /// Listen address; overrides the file.
    #[arg(short, long)]
    bind: Option<String>,
}

impl Cli {
    fn load(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => {
                let mut config = RelayConfig::default();
                config.apply_env();
                config
            }
        };

        if let Some(origin) = &self.origin {
            config.origin.url = Some(origin.clone());
        }
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init(&config.observability);
    tracing::info!("edge-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = RelayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
