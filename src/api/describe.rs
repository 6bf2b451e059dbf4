//! Describe endpoint handler — pre-fills the scene text from a sketch.

use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::api::types::{DescribeBody, DescribeReply};
use crate::error::BoardError;
use crate::server::AppState;

/// POST /api/describe — one stateless vision call, no generation pipeline.
pub async fn describe(
    State(state): State<AppState>,
    Json(body): Json<DescribeBody>,
) -> Result<Json<DescribeReply>, BoardError> {
    debug!(op = "describe", has_image = body.image.is_some(), "request received");

    let image = body.validate()?;
    let description = state.context.describer.describe(&image).await?;

    Ok(Json(DescribeReply { description }))
}
