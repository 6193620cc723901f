//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, overlay APP_* env vars)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to the request handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at process start and never re-read per request
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, Environment, GatewayConfig, ListenerConfig, ObservabilityConfig, UpstreamConfig,
};
