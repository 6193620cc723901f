//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber once at startup
//! - Pick a default filter from the runtime mode
//!
//! # Design Decisions
//! - `RUST_LOG` wins over config, config wins over the mode default
//! - JSON lines when `observability.json_logs` is set, pretty format otherwise

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::GatewayConfig;

const PRODUCTION_FILTER: &str = "feed_gateway=info";
const DEVELOPMENT_FILTER: &str = "feed_gateway=debug,tower_http=debug";

/// The filter directive used when `RUST_LOG` is not set.
pub fn default_filter(config: &GatewayConfig) -> &str {
    match &config.observability.log_filter {
        Some(filter) => filter.as_str(),
        None if config.is_development() => DEVELOPMENT_FILTER,
        None => PRODUCTION_FILTER,
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &GatewayConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_default_filter_by_mode() {
        let mut config = GatewayConfig::default();
        assert_eq!(default_filter(&config), PRODUCTION_FILTER);

        config.environment = Environment::Development;
        assert_eq!(default_filter(&config), DEVELOPMENT_FILTER);

        config.observability.log_filter = Some("warn".into());
        assert_eq!(default_filter(&config), "warn");
    }
}
