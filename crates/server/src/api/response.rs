//! JSON response shapes for the conversion endpoint.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use spodl_core::{ConversionOutcome, ConversionStage, RequestError, TrackMetadata, ValidationError};
use tracing::error;

/// Usage hint returned when the `url` parameter is missing.
pub const USAGE_EXAMPLE: &str = "/?url=https://open.spotify.com/track/XXXXXXXXX";

/// Envelope shared by every conversion response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ApiResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            example: None,
        }
    }

    fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }
}

/// `data` of a successful conversion.
#[derive(Debug, Serialize)]
pub struct ConversionData {
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub thumbnail: Option<String>,
    pub download_url: String,
}

impl ConversionData {
    fn new(metadata: TrackMetadata, download_url: String) -> Self {
        Self {
            title: metadata.title,
            artist: metadata.artist,
            duration: metadata.duration,
            thumbnail: metadata.thumbnail,
            download_url,
        }
    }
}

fn stage_message(stage: ConversionStage) -> &'static str {
    match stage {
        ConversionStage::Metadata => "Failed to fetch track information",
        ConversionStage::TaskCreation => "Failed to create conversion task",
        ConversionStage::Conversion => "Conversion failed",
    }
}

/// Map a conversion outcome to its status code and body.
pub fn shape_outcome(outcome: ConversionOutcome) -> (StatusCode, Json<ApiResponse>) {
    match outcome {
        ConversionOutcome::Success {
            metadata,
            download_url,
        } => {
            let data = ConversionData::new(metadata, download_url);
            let body = ApiResponse {
                success: true,
                message: "Success".to_string(),
                data: Some(serde_json::to_value(data).unwrap_or(Value::Null)),
                example: None,
            };
            (StatusCode::OK, Json(body))
        }
        ConversionOutcome::UpstreamFailure { stage, payload } => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::failure(stage_message(stage)).with_data(payload)),
        ),
        ConversionOutcome::Timeout { .. } => (
            StatusCode::REQUEST_TIMEOUT,
            Json(ApiResponse::failure("Conversion took too long (timeout)")),
        ),
        ConversionOutcome::Invalid(e @ ValidationError::MissingUrl) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(e.to_string()).with_example(USAGE_EXAMPLE)),
        ),
        ConversionOutcome::Invalid(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(e.to_string())),
        ),
    }
}

/// An upstream request that failed outright.
pub fn shape_request_error(err: &RequestError) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(err.to_string())),
    )
}

/// Response for a handler panic (used with `CatchPanicLayer`).
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };
    error!("Handler panicked: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(message)),
    )
        .into_response()
}
