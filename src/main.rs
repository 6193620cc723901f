//! Feed gateway server.
//!
//! Serves `GET /api/parse`, which fetches an allow-listed feed, parses it,
//! and optionally projects it through a JSONPath expression.
//!
//! Configuration is read once here: an optional TOML file, then `APP_*`
//! environment variables, then command-line flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use feed_gateway::config::validation::validate_config;
use feed_gateway::config::{load_config, ConfigError};
use feed_gateway::lifecycle::{spawn_signal_listener, Shutdown};
use feed_gateway::observability::init_logging;
use feed_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "feed-gateway")]
#[command(about = "Authenticated feed-to-JSON gateway", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config)
            .map_err(ConfigError::Validation)
            .context("Invalid --bind address")?;
    }

    init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        allowed_host = %config.upstream.allowed_host,
        development = config.is_development(),
        "feed-gateway starting"
    );

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.listener.bind_address))?;

    let server = HttpServer::new(config).context("Failed to build HTTP client")?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
