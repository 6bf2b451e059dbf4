//! Image payload codec: base64 transport form, data-URI convention, and
//! normalization of heterogeneous provider results.

use std::time::Duration;

use base64::Engine;
use reqwest::Client;

use crate::error::BoardError;

/// Media type assigned to results whose provider omits one. Remote fetches
/// are always re-tagged with this; the content-type header is not trusted.
const DEFAULT_MIME_TYPE: &str = "image/png";

/// Deadline for fetching a remote result URL.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// An image in its transportable encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Media type (e.g. `image/png`, `image/jpeg`).
    pub mime_type: String,
    /// Base64-encoded image bytes. Never empty.
    pub base64: String,
}

impl EncodedImage {
    /// Build an encoded image, checking that the payload is non-empty,
    /// decodable base64 and that a media type is declared.
    ///
    /// # Errors
    ///
    /// Returns a description of the violated invariant.
    pub fn new(mime_type: &str, payload: &str) -> Result<Self, String> {
        if mime_type.is_empty() {
            return Err("missing media type".to_string());
        }
        if payload.is_empty() {
            return Err("empty image payload".to_string());
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| format!("payload is not valid base64: {e}"))?;
        Ok(Self { mime_type: mime_type.to_string(), base64: payload.to_string() })
    }

    /// Encode raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns a description if `data` is empty.
    pub fn from_bytes(mime_type: &str, data: &[u8]) -> Result<Self, String> {
        if data.is_empty() {
            return Err("empty image payload".to_string());
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        Ok(Self { mime_type: mime_type.to_string(), base64: encoded })
    }

    /// Decode the payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a description if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, String> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64)
            .map_err(|e| format!("payload is not valid base64: {e}"))
    }

    /// Render as a `data:<media-type>;base64,<payload>` string, the form
    /// handed to callers and accepted back for vary/edit.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Parse a data-URI string produced by [`Self::to_data_uri`].
    ///
    /// # Errors
    ///
    /// Returns a description if the string does not follow the convention.
    pub fn from_data_uri(uri: &str) -> Result<Self, String> {
        let rest = uri.strip_prefix("data:").ok_or("missing data: scheme")?;
        let (mime_type, payload) =
            rest.split_once(";base64,").ok_or("missing ;base64, separator")?;
        if !mime_type.starts_with("image/") {
            return Err(format!("not an image media type: {mime_type}"));
        }
        Self::new(mime_type, payload)
    }
}

/// A single result as returned by a provider, before normalization.
///
/// Providers embed either the payload itself or a URL to retrieve it from;
/// the wire shape carries both as optional fields, but exactly one is ever
/// populated per result.
#[derive(Debug, Clone)]
pub enum RawResult {
    /// Payload delivered inline as base64.
    Inline {
        /// Base64 payload.
        data: String,
        /// Declared media type, when the provider sends one.
        mime_type: Option<String>,
    },
    /// Payload hosted at a short-lived URL.
    Remote {
        /// The result URL.
        url: String,
    },
}

impl RawResult {
    /// Convert a provider result's optional wire fields into the tagged
    /// form. The URL branch wins when both fields are populated.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedResponse`] when neither field is
    /// populated.
    pub fn from_parts(
        url: Option<String>,
        payload: Option<String>,
        mime_type: Option<String>,
    ) -> Result<Self, BoardError> {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            return Ok(Self::Remote { url });
        }
        if let Some(data) = payload.filter(|p| !p.is_empty()) {
            return Ok(Self::Inline { data, mime_type });
        }
        Err(BoardError::MalformedResponse("result carries neither payload nor URL".to_string()))
    }
}

/// Normalizes raw provider results into [`EncodedImage`], fetching remote
/// URLs when needed.
pub struct ResultNormalizer {
    client: Client,
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultNormalizer {
    /// Create a normalizer with its own HTTP client for result fetches.
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build().unwrap_or_default();
        Self { client }
    }

    /// Turn a raw result into an encoded image.
    ///
    /// Inline payloads are wrapped directly, defaulting the media type when
    /// the provider omits one. Remote results are fetched in full and
    /// re-encoded; the fetched bytes are always tagged `image/png`.
    ///
    /// # Errors
    ///
    /// [`BoardError::ResultFetchFailed`] if a remote URL is unreachable or
    /// answers non-2xx; [`BoardError::MalformedResponse`] if the payload
    /// itself is unusable.
    pub async fn normalize(&self, result: RawResult) -> Result<EncodedImage, BoardError> {
        match result {
            RawResult::Inline { data, mime_type } => {
                let mime = mime_type.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
                EncodedImage::new(&mime, &data).map_err(BoardError::MalformedResponse)
            }
            RawResult::Remote { url } => {
                let response = self.client.get(&url).send().await.map_err(|e| {
                    BoardError::ResultFetchFailed { url: url.clone(), message: e.to_string() }
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(BoardError::ResultFetchFailed {
                        url,
                        message: format!("status {status}"),
                    });
                }
                let bytes = response.bytes().await.map_err(|e| {
                    BoardError::ResultFetchFailed { url: url.clone(), message: e.to_string() }
                })?;
                EncodedImage::from_bytes(DEFAULT_MIME_TYPE, &bytes)
                    .map_err(BoardError::MalformedResponse)
            }
        }
    }
}
