//! Backend selection and model identifiers.

/// Supported image generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Google Gemini API: one blocking call, results inline in the response.
    Gemini,
    /// Qwen `DashScope` API: task-based submit/poll protocol.
    Qwen,
}

/// Gemini model used for sketch-to-frame generation and edits.
pub const GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Gemini model used for describing an uploaded sketch.
pub const GEMINI_DESCRIBE_MODEL: &str = "gemini-2.5-flash";

/// Qwen model used for sketch-to-frame generation and edits.
pub const QWEN_IMAGE_MODEL: &str = "qwen-image-edit-plus";

/// Qwen model used for describing an uploaded sketch.
pub const QWEN_DESCRIBE_MODEL: &str = "qwen-vl-max";

/// Parse the configured backend name.
///
/// # Errors
///
/// Returns an error if the name doesn't match a known backend.
pub fn parse_backend(name: &str) -> Result<Provider, String> {
    match name.to_ascii_lowercase().as_str() {
        "gemini" => Ok(Provider::Gemini),
        "qwen" => Ok(Provider::Qwen),
        other => Err(format!("Unknown backend '{other}'. Expected 'gemini' or 'qwen'.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gemini() {
        assert_eq!(parse_backend("gemini").unwrap(), Provider::Gemini);
        assert_eq!(parse_backend("Gemini").unwrap(), Provider::Gemini);
    }

    #[test]
    fn parse_qwen() {
        assert_eq!(parse_backend("qwen").unwrap(), Provider::Qwen);
        assert_eq!(parse_backend("QWEN").unwrap(), Provider::Qwen);
    }

    #[test]
    fn parse_unknown_backend() {
        assert!(parse_backend("openai").is_err());
        assert!(parse_backend("").is_err());
    }
}
