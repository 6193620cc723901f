use reqwest::StatusCode;
use thiserror::Error;

use crate::params::ParseParams;

/// Errors that can occur while retrieving a feed.
///
/// The split matters to callers: a non-success status is the upstream's
/// answer and is shown to the client, while a transport failure means the
/// gateway never got an answer at all.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, body read)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {status}")]
    HttpStatus {
        status: StatusCode,
        status_text: String,
    },
}

/// Single-shot HTTP retrieval of feed documents.
///
/// Holds one pooled `reqwest::Client` for the life of the process. There are
/// no retries and no timeout beyond the client's defaults; failures are
/// surfaced as-is.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    /// Build a fetcher that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Issue one GET for the validated URL and return the raw body.
    pub async fn fetch(&self, params: &ParseParams) -> Result<Vec<u8>, FetchError> {
        let url = params.url();
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let status_text = reason_phrase(&response);
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                "Upstream returned non-success status"
            );
            return Err(FetchError::HttpStatus {
                status,
                status_text,
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(url = %url, bytes = bytes.len(), "Fetched feed");
        Ok(bytes.to_vec())
    }
}

/// The reason phrase the upstream actually sent.
///
/// hyper only records the phrase when it differs from the canonical one, so
/// the canonical phrase is the fallback.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}
