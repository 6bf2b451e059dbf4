//! Prompt templates and composition.
//!
//! Every instruction sent to a backend is rendered from a fixed template by
//! literal slot substitution. Same inputs, same bytes.

/// Slot filled with the style block of the selected visual style.
const STYLE_SLOT: &str = "{STYLE_INSTRUCTIONS}";

/// Slot filled with the scene description or edit instruction.
const CONTENT_SLOT: &str = "{CONTENT}";

/// Template for turning a sketch into a storyboard frame.
pub const GENERATE_TEMPLATE: &str = "\
Transform this rough sketch into a professional monochrome storyboard frame.

{STYLE_INSTRUCTIONS}

Requirements:
- Maintain the exact composition and camera angle from the sketch
- Apply dramatic cinematic lighting
- Use only black and white (monochrome)
- Professional storyboard quality
- Clear character poses and forms

Scene description: {CONTENT}";

/// Template for applying an edit to a previously generated frame.
pub const EDIT_TEMPLATE: &str = "\
Based on the provided image, apply the following edit: \"{CONTENT}\".

Maintain the original artistic style which is defined as: \"{STYLE_INSTRUCTIONS}\".

Requirements:
- Integrate the edit seamlessly with the existing composition
- Preserve the original mood and atmosphere
- Use only black and white (monochrome)
- Maintain professional storyboard quality";

/// Instruction sent with a sketch to pre-fill the scene description.
pub const DESCRIBE_PROMPT: &str = "\
Describe the scene in this rough sketch for a storyboard artist: the subjects, \
their poses and positions, the camera angle, and the mood. Answer with the \
description only, in two or three sentences.";

/// Render the final instruction text from a template, a style block and
/// free-form content. Pure string substitution; no conditionals, no
/// escaping.
#[must_use]
pub fn compose(template: &str, style_instructions: &str, content: &str) -> String {
    template.replace(STYLE_SLOT, style_instructions).replace(CONTENT_SLOT, content)
}
