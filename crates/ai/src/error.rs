//! Errors from the generative model boundary.
//!
//! None of these reach callers of [`crate::TaskAssistant`]; each one is
//! logged and answered with the deterministic fallback.

use std::time::Duration;

/// Failure to obtain text from the model.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key configured
    #[error("no API key configured for the generative model")]
    MissingApiKey,

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API
    #[error("model API returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The call exceeded the configured timeout
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered without any text
    #[error("model returned no text")]
    EmptyResponse,
}

/// Model text that does not satisfy the expected schema.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// No `{ ... }` span in the text
    #[error("no JSON object found in model response")]
    NoJsonObject,

    /// The span is not valid JSON of the expected shape
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed but violates a constraint
    #[error("{0}")]
    Invalid(String),
}
