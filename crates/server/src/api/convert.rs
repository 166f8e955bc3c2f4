//! Conversion endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use spodl_core::{ConversionOutcome, ValidationError};
use tracing::{error, warn};

use super::response::{shape_outcome, shape_request_error, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    #[serde(default)]
    pub url: Option<String>,
}

/// GET /?url=<spotify-track-url>
///
/// Runs a full conversion and answers once the download link is ready, the
/// upstream gives up, or polling times out. Requests are independent; a slow
/// conversion does not hold up others.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ConvertParams>, QueryRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    // e.g. a repeated `url` parameter
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            warn!("Rejected query string: {}", rejection.body_text());
            return shape_outcome(ConversionOutcome::Invalid(ValidationError::InvalidUrl));
        }
    };

    match state.orchestrator().convert_url(params.url.as_deref()).await {
        Ok(outcome) => shape_outcome(outcome),
        Err(e) => {
            error!("Conversion request failed: {}", e);
            shape_request_error(&e)
        }
    }
}
