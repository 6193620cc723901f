//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the feed gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Runtime mode. Development disables authentication.
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Shared-secret authentication.
    pub auth: AuthConfig,

    /// Which feeds the gateway may fetch, and how.
    pub upstream: UpstreamConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// True when running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Process mode, bound from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    /// Parse an `APP_ENV` value. Anything but `development` is production.
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Authentication configuration.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Value callers must present in `X-Auth-Key`.
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Upstream fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Substring every target URL must contain.
    pub allowed_host: String,

    /// User-Agent sent with outbound requests.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            allowed_host: "rsshub.app".to_string(),
            user_agent: concat!("feed-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive; falls back to a mode-dependent default.
    pub log_filter: Option<String>,

    /// Emit logs as JSON lines instead of the pretty format.
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.upstream.allowed_host, "rsshub.app");
        assert!(config.auth.secret.is_none());
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_partial_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            environment = "development"

            [auth]
            secret = "s3cret"

            [upstream]
            allowed_host = "feeds.example.org"
            "#,
        )
        .unwrap();
        assert!(config.is_development());
        assert_eq!(config.auth.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.upstream.allowed_host, "feeds.example.org");
        assert!(config.upstream.user_agent.starts_with("feed-gateway/"));
    }

    #[test]
    fn test_environment_from_env_value() {
        assert_eq!(Environment::from_env_value("development"), Environment::Development);
        assert_eq!(Environment::from_env_value("DEVELOPMENT"), Environment::Development);
        assert_eq!(Environment::from_env_value("staging"), Environment::Production);
        assert_eq!(Environment::from_env_value(""), Environment::Production);
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let auth = AuthConfig {
            secret: Some("hunter2".into()),
        };
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("REDACTED"));
    }
}
