//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → tracing events (structured fields, request_id)
//!     → TraceLayer spans (development mode only)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;
