//! Request parameter handling for `/api/parse`.
//!
//! # Data Flow
//! ```text
//! raw query string
//!     → codec.rs (form-decode, group repeated keys, best-effort JSON typing)
//!     → schema.rs (required/type/URL/allow-list checks, all issues collected)
//!     → ParseParams (validated; the only type the fetcher accepts)
//! ```

pub mod codec;
pub mod schema;

pub use codec::{decode_query, lenient_parse, LooseValue};
pub use schema::{validate, Issue, IssueCode, ParseParams, UpstreamPolicy, ValidationErrors};

/// Decode and validate a raw query string in one step.
pub fn parse_params(
    raw_query: &str,
    policy: &UpstreamPolicy,
) -> Result<ParseParams, ValidationErrors> {
    validate(&decode_query(raw_query), policy)
}
