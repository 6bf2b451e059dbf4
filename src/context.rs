//! Service context bundling the port trait objects for the configured
//! backend.
//!
//! Built once at startup from [`Config`] and shared read-only across all
//! handler invocations. Which adapter variant serves a deployment is decided
//! here, never per request.

use std::sync::Arc;

use crate::adapters::gemini::{GeminiProvider, GEMINI_API_BASE};
use crate::adapters::qwen::{QwenProvider, QWEN_API_BASE};
use crate::config::Config;
use crate::error::BoardError;
use crate::model::Provider;
use crate::ports::{ImageProvider, SketchDescriber};

/// Bundles the port trait objects into a single context.
#[derive(Clone)]
pub struct ServiceContext {
    /// Image generation port.
    pub provider: Arc<dyn ImageProvider>,
    /// Sketch description port.
    pub describer: Arc<dyn SketchDescriber>,
}

impl ServiceContext {
    /// Create a live context for the given backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend's API key is not configured.
    pub fn live(backend: Provider, config: &Config) -> Result<Self, BoardError> {
        match backend {
            Provider::Gemini => {
                let key = config.gemini_key().ok_or(BoardError::MissingApiKey {
                    provider: "Gemini".into(),
                    env_var: "GEMINI_API_KEY".into(),
                })?;
                let base = config.gemini_base().unwrap_or_else(|| GEMINI_API_BASE.to_string());
                let adapter = Arc::new(GeminiProvider::new(key, base));
                Ok(Self { provider: adapter.clone(), describer: adapter })
            }
            Provider::Qwen => {
                let key = config.qwen_key().ok_or(BoardError::MissingApiKey {
                    provider: "Qwen".into(),
                    env_var: "QWEN_API_KEY".into(),
                })?;
                let base = config.qwen_base().unwrap_or_else(|| QWEN_API_BASE.to_string());
                let adapter = Arc::new(QwenProvider::new(key, base));
                Ok(Self { provider: adapter.clone(), describer: adapter })
            }
        }
    }

    /// Assemble a context from already-built ports. Used by tests to wire
    /// in scripted adapters.
    #[must_use]
    pub fn from_parts(
        provider: Arc<dyn ImageProvider>,
        describer: Arc<dyn SketchDescriber>,
    ) -> Self {
        Self { provider, describer }
    }
}
