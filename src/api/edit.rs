//! Edit endpoint handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::{debug, info};

use crate::api::types::{EditBody, EditReply};
use crate::error::BoardError;
use crate::ports::image_provider::SubmitRequest;
use crate::prompt::{compose, EDIT_TEMPLATE};
use crate::server::AppState;

/// POST /api/edit — apply an instruction to a previously generated frame,
/// preserving its style.
pub async fn edit(
    State(state): State<AppState>,
    Json(body): Json<EditBody>,
) -> Result<Json<EditReply>, BoardError> {
    debug!(
        op = "edit",
        has_image = body.original_image.is_some(),
        has_instruction = body.edit_instruction.is_some(),
        has_style = body.style_prompt.is_some(),
        "request received"
    );

    let request = body.validate()?;
    let prompt = compose(EDIT_TEMPLATE, &request.style_instructions, &request.edit_instruction);

    let started = Instant::now();
    let image = state
        .context
        .provider
        .submit(&SubmitRequest { prompt, image: request.source_image })
        .await?;
    info!(op = "edit", elapsed = ?started.elapsed(), "frame edited");

    Ok(Json(EditReply { edited_image: image.to_data_uri() }))
}
