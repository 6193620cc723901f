//! Feed gateway library.
//!
//! An authenticated HTTP endpoint that fetches an allow-listed RSS/Atom/JSON
//! feed, parses it, and optionally narrows it with a JSONPath expression.
//!
//! # Request Pipeline
//!
//! ```text
//!   GET /api/parse?url=..&jq=..
//!        │
//!        ▼
//!   security::auth ──✗──▶ 401
//!        │
//!        ▼
//!   params (decode + validate) ──✗──▶ 400 {issues}
//!        │
//!        ▼
//!   feed::FeedFetcher ──✗──▶ 400 status text │ 500
//!        │
//!        ▼
//!   feed::parse_feed ──✗──▶ 500
//!        │
//!        ▼
//!   query::project (optional, never fails)
//!        │
//!        ▼
//!   200 JSON
//! ```

// Core pipeline
pub mod error;
pub mod feed;
pub mod params;
pub mod query;

// Serving
pub mod http;
pub mod security;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
