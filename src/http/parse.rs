//! `GET /api/parse`: fetch a feed, parse it, optionally project it.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::GatewayError;
use crate::feed::parse_feed;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::params::parse_params;
use crate::query::{project, Projection};

pub async fn parse_feed_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let request_id = request_id(&headers);

    match run_pipeline(&state, request_id, raw_query.as_deref().unwrap_or_default()).await {
        Ok(value) => Json(value).into_response(),
        Err(err) => {
            if err.status().is_server_error() {
                tracing::error!(request_id = %request_id, error = %err, "Parse request failed");
            } else {
                tracing::info!(request_id = %request_id, error = %err, "Parse request rejected");
            }
            err.into_response()
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    request_id: &str,
    raw_query: &str,
) -> Result<Value, GatewayError> {
    let params = parse_params(raw_query, &state.policy)?;

    tracing::debug!(
        request_id = %request_id,
        url = %params.url(),
        query = params.query().unwrap_or_default(),
        "Fetching feed"
    );

    let body = state.fetcher.fetch(&params).await?;
    let document = parse_feed(&body)?;
    let document = serde_json::to_value(&document)
        .map_err(|e| GatewayError::Internal(e.to_string()))?;

    let Some(query) = params.query() else {
        return Ok(document);
    };

    let projection = project(query, &document);
    if let Projection::Contained(err) = &projection {
        tracing::warn!(request_id = %request_id, error = %err, "Query could not be evaluated");
    }
    Ok(projection.into_value())
}
