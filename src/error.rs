//! Unified error type for boardgen.

use thiserror::Error;

/// Errors that can occur while serving a storyboard operation.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The inbound request is missing or carries malformed fields.
    /// Raised before any provider call is made.
    #[error("{0}")]
    InvalidRequest(String),

    /// The provider could not be reached at the transport level.
    #[error("Provider unreachable: {0}")]
    ProviderUnavailable(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("Provider error ({status}): {message}")]
    ProviderError {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Response body text from the provider.
        message: String,
    },

    /// The provider explicitly reported the generation job as failed.
    #[error("Generation task failed: {message}")]
    TaskFailed {
        /// Failure message from the provider's task status.
        message: String,
    },

    /// The generation job never reached a terminal state in budget.
    #[error("Task {task_id} still not terminal after {attempts} status checks")]
    PollTimeout {
        /// Identifier of the task that timed out.
        task_id: String,
        /// Number of status queries issued before giving up.
        attempts: u32,
    },

    /// A remote result URL could not be fetched.
    #[error("Failed to fetch result from {url}: {message}")]
    ResultFetchFailed {
        /// The result URL that was unreachable.
        url: String,
        /// Transport or status error description.
        message: String,
    },

    /// The provider returned success but no usable image data.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Configuration error at startup.
    #[error("Config error: {0}")]
    Config(String),

    /// No API key configured for the selected backend.
    #[error("No API key for {provider}. Set {env_var} or add it to the config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}

impl BoardError {
    /// Stable machine-readable kind for the HTTP error body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::ProviderError { .. } => "provider_error",
            Self::TaskFailed { .. } => "task_failed",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::ResultFetchFailed { .. } => "result_fetch_failed",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Config(_) | Self::MissingApiKey { .. } => "config",
        }
    }
}
