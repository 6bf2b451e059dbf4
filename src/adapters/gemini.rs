//! Live adapter for the Gemini API — the synchronous backend variant.
//!
//! One network call per submission; the call blocks until the provider
//! returns final results, which arrive inline in the response body. No
//! separate polling step exists in this protocol.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::codec::{EncodedImage, RawResult, ResultNormalizer};
use crate::error::BoardError;
use crate::model::{GEMINI_DESCRIBE_MODEL, GEMINI_IMAGE_MODEL};
use crate::ports::describer::{DescribeFuture, SketchDescriber};
use crate::ports::image_provider::{ImageProvider, SubmitFuture, SubmitRequest};
use crate::prompt::DESCRIBE_PROMPT;

/// Default API base for the Google AI endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Deadline for one generation call.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Live Gemini backend.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    normalizer: ResultNormalizer,
}

impl GeminiProvider {
    /// Create a Gemini backend with the given API key and endpoint base.
    #[must_use]
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = Client::builder().timeout(SUBMIT_TIMEOUT).build().unwrap_or_default();
        Self { client, api_key, base_url, normalizer: ResultNormalizer::new() }
    }

    async fn generate_content(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<GeminiResponse, BoardError> {
        let url = format!("{}/{model}:generateContent", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(BoardError::ProviderError {
                status: status.as_u16(),
                message: response_text,
            });
        }

        serde_json::from_str(&response_text)
            .map_err(|e| BoardError::MalformedResponse(format!("unparseable response: {e}")))
    }
}

impl ImageProvider for GeminiProvider {
    fn submit(&self, request: &SubmitRequest) -> SubmitFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = serde_json::json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {
                            "mimeType": request.image.mime_type,
                            "data": request.image.base64,
                        }},
                        {"text": request.prompt}
                    ]
                }],
                "generationConfig": {
                    "responseModalities": ["IMAGE"]
                }
            });

            let parsed = self.generate_content(GEMINI_IMAGE_MODEL, body).await?;
            let raw = parsed.first_inline_result().ok_or_else(|| {
                BoardError::MalformedResponse("no image data in response".to_string())
            })?;
            self.normalizer.normalize(raw).await
        })
    }
}

impl SketchDescriber for GeminiProvider {
    fn describe(&self, image: &EncodedImage) -> DescribeFuture<'_> {
        let image = image.clone();
        Box::pin(async move {
            let body = serde_json::json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.base64,
                        }},
                        {"text": DESCRIBE_PROMPT}
                    ]
                }]
            });

            let parsed = self.generate_content(GEMINI_DESCRIBE_MODEL, body).await?;
            parsed.first_text().map(|t| t.trim().to_string()).ok_or_else(|| {
                BoardError::MalformedResponse("no description text in response".to_string())
            })
        })
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// First inline image part across all candidates, as a raw result.
    fn first_inline_result(&self) -> Option<RawResult> {
        self.candidates
            .iter()
            .flat_map(|c| &c.content.parts)
            .find_map(|p| p.inline_data.as_ref())
            .map(|inline| RawResult::Inline {
                data: inline.data.clone(),
                mime_type: Some(inline.mime_type.clone()),
            })
    }

    /// First text part across all candidates.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .flat_map(|c| &c.content.parts)
            .find_map(|p| p.text.as_deref())
    }
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}
