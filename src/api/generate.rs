//! Generate and vary endpoint handlers.
//!
//! Vary is the generate pipeline invoked with one of the system's own prior
//! outputs as the source image; the caller round-trips it out of its
//! data-URI form first. Same template, same submission path.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::{debug, info};

use crate::api::types::{GenerateBody, GenerateReply};
use crate::error::BoardError;
use crate::ports::image_provider::SubmitRequest;
use crate::prompt::{compose, GENERATE_TEMPLATE};
use crate::server::AppState;

/// POST /api/generate — turn a sketch + scene text + style into a frame.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateReply>, BoardError> {
    run_generation("generate", &state, body).await
}

/// POST /api/vary — re-run generation from a previously generated frame.
pub async fn vary(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateReply>, BoardError> {
    run_generation("vary", &state, body).await
}

async fn run_generation(
    op: &'static str,
    state: &AppState,
    body: GenerateBody,
) -> Result<Json<GenerateReply>, BoardError> {
    debug!(
        op,
        has_prompt = body.prompt.is_some(),
        has_image = body.image.is_some(),
        has_style = body.style_prompt.is_some(),
        "request received"
    );

    // Fail fast: nothing goes over the network for a bad request.
    let request = body.validate()?;
    let prompt = compose(GENERATE_TEMPLATE, &request.style_instructions, &request.scene_text);

    let started = Instant::now();
    let image = state
        .context
        .provider
        .submit(&SubmitRequest { prompt, image: request.source_image })
        .await?;
    info!(op, elapsed = ?started.elapsed(), "frame generated");

    Ok(Json(GenerateReply { images: vec![image.to_data_uri()] }))
}
