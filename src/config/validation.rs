//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (bind address parses, allow-list not empty)
//! - Refuse to run unauthenticated outside development mode
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upstream.allowed_host must not be empty")]
    EmptyAllowedHost,

    #[error("auth.secret (or APP_SECRET) is required outside development mode")]
    MissingSecret,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.allowed_host.trim().is_empty() {
        errors.push(ValidationError::EmptyAllowedHost);
    }

    let has_secret = config
        .auth
        .secret
        .as_deref()
        .is_some_and(|s| !s.is_empty());
    if !has_secret && !config.is_development() {
        errors.push(ValidationError::MissingSecret);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
