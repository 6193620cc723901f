//! Terminal request errors and their HTTP mapping.
//!
//! Every failure on the request path ends up as exactly one [`GatewayError`],
//! and `IntoResponse` is the only place a failure becomes a status and body.
//!
//! | Variant      | Status | Body                      |
//! |--------------|--------|---------------------------|
//! | `Auth`       | 401    | `Invalid request`         |
//! | `Validation` | 400    | JSON issue list           |
//! | `Upstream`   | 400    | upstream status text      |
//! | `Transport`  | 500    | JSON string of the error  |
//! | `Parse`      | 500    | JSON string of the error  |
//! | `Internal`   | 500    | JSON string of the error  |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::feed::{FetchError, ParseFeedError};
use crate::params::ValidationErrors;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid request")]
    Auth,

    #[error("Invalid parameters: {0}")]
    Validation(ValidationErrors),

    #[error("Upstream responded {status}: {status_text}")]
    Upstream {
        status: StatusCode,
        status_text: String,
    },

    #[error("Failed to reach upstream: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to parse feed: {0}")]
    Parse(#[from] ParseFeedError),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Auth => StatusCode::UNAUTHORIZED,
            GatewayError::Validation(_) | GatewayError::Upstream { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Transport(_) | GatewayError::Parse(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationErrors> for GatewayError {
    fn from(errors: ValidationErrors) -> Self {
        GatewayError::Validation(errors)
    }
}

impl From<FetchError> for GatewayError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(e) => GatewayError::Transport(e),
            FetchError::HttpStatus {
                status,
                status_text,
            } => GatewayError::Upstream {
                status,
                status_text,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GatewayError::Auth => (status, "Invalid request").into_response(),
            GatewayError::Validation(errors) => (status, Json(errors)).into_response(),
            GatewayError::Upstream { status_text, .. } => (status, status_text).into_response(),
            other => (status, Json(other.to_string())).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{parse_params, UpstreamPolicy};

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_auth_is_401() {
        let response = GatewayError::Auth.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Invalid request");
    }

    #[tokio::test]
    async fn test_validation_is_400_json() {
        let errors = parse_params("", &UpstreamPolicy::new("rsshub.app")).unwrap_err();
        let response = GatewayError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["issues"][0]["path"][0], "url");
    }

    #[tokio::test]
    async fn test_upstream_is_400_with_status_text() {
        let response = GatewayError::Upstream {
            status: StatusCode::NOT_FOUND,
            status_text: "Not Found".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_internal_is_500_json_string() {
        let response = GatewayError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "\"boom\"");
    }

    #[tokio::test]
    async fn test_parse_error_is_500() {
        let err = crate::feed::parse_feed(b"garbage").unwrap_err();
        let response = GatewayError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.starts_with("\"Failed to parse feed"));
    }
}
