//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/api` handlers
//! - Wire up middleware (request ID, CORS, auth, dev-mode tracing)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderName, Method, Request},
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::feed::FeedFetcher;
use crate::http::parse::parse_feed_handler;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::params::UpstreamPolicy;
use crate::security::auth::{require_auth_key, AuthGate, X_AUTH_KEY};

/// Application state injected into handlers. Immutable after startup.
pub struct AppState {
    pub config: GatewayConfig,
    pub auth: AuthGate,
    pub fetcher: FeedFetcher,
    pub policy: UpstreamPolicy,
}

impl AppState {
    /// Derive the runtime collaborators from a validated config.
    pub fn from_config(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let fetcher = FeedFetcher::new(&config.upstream.user_agent)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: GatewayConfig, fetcher: FeedFetcher) -> Self {
        let auth = if config.is_development() {
            AuthGate::disabled()
        } else {
            AuthGate::new(config.auth.secret.clone())
        };
        let policy = UpstreamPolicy::new(config.upstream.allowed_host.clone());

        Self {
            config,
            auth,
            fetcher,
            policy,
        }
    }
}

/// HTTP server for the feed gateway.
pub struct HttpServer {
    router: Router,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::from_state(AppState::from_config(config)?))
    }

    pub fn from_state(state: AppState) -> Self {
        let state = Arc::new(state);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: request ID, tracing (development only),
    /// request ID propagation, CORS, then the auth gate.
    fn build_router(state: Arc<AppState>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([HeaderName::from_static(X_AUTH_KEY)]);

        let router = Router::new()
            .route("/api/parse", get(parse_feed_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth_key,
            ))
            .layer(cors)
            .layer(propagate_request_id_layer())
            .with_state(state.clone());

        let router = if state.config.is_development() {
            router.layer(TraceLayer::new_for_http().make_span_with(
                |request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                },
            ))
        } else {
            router
        };

        router.layer(set_request_id_layer())
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            development = self.state.config.is_development(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
