//! Error types for the AI flows.

use thiserror::Error;

/// Errors raised while rendering a prompt or calling the model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    /// A flow input failed validation.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// Template references a field the input does not provide, or is malformed.
    #[error("template {template}: {reason}")]
    Template {
        template: &'static str,
        reason: String,
    },

    /// No API key in the environment.
    #[error("no API key found; set {env_var}")]
    MissingApiKey { env_var: String },

    /// Request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response carried no text candidate.
    #[error("model returned no output")]
    EmptyResponse,

    /// Model output does not match the flow's output schema.
    #[error("model output does not match the expected schema: {0}")]
    MalformedOutput(String),
}

impl AiError {
    /// Short message for display next to the failed form.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidInput { .. } => "Some of the inputs are missing or invalid.",
            Self::MissingApiKey { .. } => "The AI service is not configured.",
            Self::Network(_) => "Could not reach the AI service. Check your connection.",
            Self::Api { .. } => "The AI service rejected the request.",
            Self::EmptyResponse | Self::MalformedOutput(_) => {
                "The AI service returned an unusable answer."
            }
            Self::Template { .. } => "An unexpected error occurred.",
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for AI operations.
pub type Result<T> = std::result::Result<T, AiError>;
