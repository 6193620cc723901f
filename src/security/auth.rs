//! Shared-secret authentication.
//!
//! Callers present the secret in `X-Auth-Key`. Pre-flight `OPTIONS`
//! requests always pass so browsers can negotiate CORS, and development
//! mode turns the check off entirely.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::GatewayError;
use crate::http::server::AppState;

/// Header carrying the caller's credential.
pub const X_AUTH_KEY: &str = "x-auth-key";

/// Compares presented credentials against the configured secret.
pub struct AuthGate {
    secret: Option<SecretString>,
    bypass: bool,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("configured", &self.secret.is_some())
            .field("bypass", &self.bypass)
            .finish()
    }
}

impl AuthGate {
    /// A gate that requires `secret`. With no secret every credential fails.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.map(SecretString::from),
            bypass: false,
        }
    }

    /// A gate that admits everything (development mode).
    pub fn disabled() -> Self {
        Self {
            secret: None,
            bypass: true,
        }
    }

    /// Check a presented credential. Comparison is byte-for-byte.
    pub fn authorize(&self, presented: Option<&[u8]>) -> Result<(), GatewayError> {
        if self.bypass {
            return Ok(());
        }
        match (&self.secret, presented) {
            (Some(secret), Some(presented)) if secret.expose_secret().as_bytes() == presented => {
                Ok(())
            }
            _ => Err(GatewayError::Auth),
        }
    }
}

/// Middleware enforcing [`AuthGate`] on everything but pre-flight requests.
pub async fn require_auth_key(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(X_AUTH_KEY)
        .map(|value| value.as_bytes());

    let has_key = presented.is_some();

    match state.auth.authorize(presented) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                has_key,
                "Rejected unauthenticated request"
            );
            err.into_response()
        }
    }
}
