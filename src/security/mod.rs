//! Security subsystem.
//!
//! # Components
//! - `auth.rs`: shared-secret `X-Auth-Key` gate
//!
//! The upstream allow-list lives with parameter validation
//! (`params::schema`), since it must hold before any URL is fetched.

pub mod auth;

pub use auth::{require_auth_key, AuthGate, X_AUTH_KEY};
