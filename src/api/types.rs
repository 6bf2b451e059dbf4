//! Wire shapes for the HTTP operations and their validation into domain
//! requests.
//!
//! Inbound fields are optional at the serde level so that missing data is
//! reported as a 400 with a useful message instead of a generic decode
//! rejection. Validation happens before any provider call.

use serde::{Deserialize, Serialize};

use crate::codec::EncodedImage;
use crate::error::BoardError;

/// An image as carried in request bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// Base64-encoded image bytes.
    pub base64: Option<String>,
    /// Declared media type.
    pub mime_type: Option<String>,
}

/// Request body for `generate` and `vary`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    /// Scene description text.
    pub prompt: Option<String>,
    /// The source sketch (or, for vary, a prior output).
    pub image: Option<ImagePayload>,
    /// Style block appended to the prompt template.
    pub style_prompt: Option<String>,
}

/// Response body for `generate` and `vary`.
#[derive(Debug, Serialize)]
pub struct GenerateReply {
    /// Generated frames as data-URI strings.
    pub images: Vec<String>,
}

/// Request body for `edit`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBody {
    /// The previously generated frame to edit.
    pub original_image: Option<ImagePayload>,
    /// What to change.
    pub edit_instruction: Option<String>,
    /// Style block the edit must preserve.
    pub style_prompt: Option<String>,
}

/// Response body for `edit`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditReply {
    /// The edited frame as a data-URI string.
    pub edited_image: String,
}

/// Request body for `describe`.
#[derive(Debug, Deserialize)]
pub struct DescribeBody {
    /// The sketch to describe.
    pub image: Option<ImagePayload>,
}

/// Response body for `describe`.
#[derive(Debug, Serialize)]
pub struct DescribeReply {
    /// Scene description derived from the sketch.
    pub description: String,
}

/// A validated generation request.
#[derive(Debug)]
pub struct GenerationRequest {
    /// Free-form scene description.
    pub scene_text: String,
    /// The sketch driving the composition.
    pub source_image: EncodedImage,
    /// Style block for the prompt template.
    pub style_instructions: String,
}

/// A validated edit request.
#[derive(Debug)]
pub struct EditRequest {
    /// The frame to edit.
    pub source_image: EncodedImage,
    /// The edit to apply.
    pub edit_instruction: String,
    /// Style block the edit must preserve.
    pub style_instructions: String,
}

impl GenerateBody {
    /// Check field presence and image payload shape.
    ///
    /// # Errors
    ///
    /// [`BoardError::InvalidRequest`] naming the missing fields.
    pub fn validate(self) -> Result<GenerationRequest, BoardError> {
        let (Some(prompt), Some(image), Some(style_prompt)) = (
            self.prompt.filter(|s| !s.is_empty()),
            self.image,
            self.style_prompt.filter(|s| !s.is_empty()),
        ) else {
            return Err(BoardError::InvalidRequest(
                "Missing required fields: prompt, image, stylePrompt".to_string(),
            ));
        };
        Ok(GenerationRequest {
            scene_text: prompt,
            source_image: validate_image(image)?,
            style_instructions: style_prompt,
        })
    }
}

impl EditBody {
    /// Check field presence and image payload shape.
    ///
    /// # Errors
    ///
    /// [`BoardError::InvalidRequest`] naming the missing fields.
    pub fn validate(self) -> Result<EditRequest, BoardError> {
        let (Some(original_image), Some(edit_instruction), Some(style_prompt)) = (
            self.original_image,
            self.edit_instruction.filter(|s| !s.is_empty()),
            self.style_prompt.filter(|s| !s.is_empty()),
        ) else {
            return Err(BoardError::InvalidRequest(
                "Missing required fields: originalImage, editInstruction, stylePrompt".to_string(),
            ));
        };
        Ok(EditRequest {
            source_image: validate_image(original_image)?,
            edit_instruction,
            style_instructions: style_prompt,
        })
    }
}

impl DescribeBody {
    /// Check field presence and image payload shape.
    ///
    /// # Errors
    ///
    /// [`BoardError::InvalidRequest`] naming the missing field.
    pub fn validate(self) -> Result<EncodedImage, BoardError> {
        let image = self.image.ok_or_else(|| {
            BoardError::InvalidRequest("Missing required field: image".to_string())
        })?;
        validate_image(image)
    }
}

/// Validate an inbound image payload: both fields present, base64 decodes,
/// and the decoded bytes carry a known raster format signature.
fn validate_image(payload: ImagePayload) -> Result<EncodedImage, BoardError> {
    let (Some(base64), Some(mime_type)) = (
        payload.base64.filter(|s| !s.is_empty()),
        payload.mime_type.filter(|s| !s.is_empty()),
    ) else {
        return Err(BoardError::InvalidRequest("Invalid image data".to_string()));
    };

    let image = EncodedImage::new(&mime_type, &base64)
        .map_err(|e| BoardError::InvalidRequest(format!("Invalid image data: {e}")))?;

    let bytes = image
        .decode()
        .map_err(|e| BoardError::InvalidRequest(format!("Invalid image data: {e}")))?;
    image::guess_format(&bytes).map_err(|_| {
        BoardError::InvalidRequest("Invalid image data: unrecognized image format".to_string())
    })?;

    Ok(image)
}
