//! HTTP operation handlers and wire types.

pub mod describe;
pub mod edit;
pub mod generate;
pub mod types;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::BoardError;

impl IntoResponse for BoardError {
    /// Map an operation failure onto the wire error shape: a stable
    /// machine-readable kind in `error`, the human-readable message in
    /// `details`. Raw transport errors never escape; only their message
    /// text does.
    fn into_response(self) -> Response {
        let status = match &self {
            BoardError::InvalidRequest(_) => {
                tracing::warn!("rejected request: {self}");
                StatusCode::BAD_REQUEST
            }
            _ => {
                tracing::error!("operation failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.kind(),
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Shared fallback for requests hitting an operation route with the wrong
/// method. Keeps the JSON error shape instead of axum's empty 405.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "method_not_allowed",
            "details": "Method not allowed",
        })),
    )
        .into_response()
}
