//! Error types for the Agri Shield domain model.

use thiserror::Error;

/// Errors raised while building or transitioning domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// A status change that does not move forward along the entity's sequence.
    #[error("illegal {entity} status transition: {from} -> {to}")]
    IllegalTransition {
        /// Entity kind ("seizure", "lab sample", ...).
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// A string that does not name a known variant.
    #[error("unknown {kind}: {value}")]
    UnknownValue {
        /// What was being parsed ("role", "tab", ...).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Authenticity score outside 0..=100.
    #[error("authenticity score {0} is outside 0..=100")]
    ScoreOutOfRange(u32),

    /// A required field was empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A form field value that does not satisfy its schema.
    #[error("invalid value for field {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }

    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
