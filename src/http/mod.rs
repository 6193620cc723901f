//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned)
//!     → security::auth (X-Auth-Key gate, OPTIONS exempt)
//!     → parse.rs (params → fetch → parse → project)
//!     → error.rs / Json (exactly one response)
//!     → Send to client
//! ```

pub mod parse;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
