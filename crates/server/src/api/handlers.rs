use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub polling: PollingBudget,
}

/// How long a single conversion may poll before timing out.
#[derive(Serialize)]
pub struct PollingBudget {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let polling = &state.config().polling;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        polling: PollingBudget {
            max_attempts: polling.max_attempts,
            interval_ms: polling.interval_ms,
        },
    })
}

/// GET /metrics
///
/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
