//! State and session error types.

use std::path::PathBuf;

use agri_model::{ModelError, RecordId};
use thiserror::Error;

/// Errors raised by state mutations and workflows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Domain rule violated (illegal transition, bad field value, ...).
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("seizure not found: {0}")]
    SeizureNotFound(RecordId),

    #[error("lab sample not found: {0}")]
    LabSampleNotFound(RecordId),

    #[error("FIR case not found: {0}")]
    FirCaseNotFound(RecordId),

    #[error("submission not found: {0}")]
    SubmissionNotFound(RecordId),

    /// Scan result at or above the authenticity threshold.
    #[error("scan scored {score}%; only products scoring below 50% can be seized")]
    NotSuspect { score: u8 },

    #[error("legal action already initiated for seizure {0}")]
    LegalActionExists(RecordId),

    #[error("no form is being filled")]
    NoActiveForm,

    /// Submission reopened while neither returned for update nor rejected.
    #[error("submission {id} is {status}, not awaiting an update")]
    NotAwaitingUpdate { id: RecordId, status: String },

    /// Fields flagged by a reviewer that have not been edited yet.
    #[error("fields still need updating: {}", .0.join(", "))]
    UpdatePending(Vec<String>),
}

/// Result type alias for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Session file error.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to {operation} session file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is not valid JSON")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("session file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    #[error("failed to serialize session")]
    Serialization(#[source] serde_json::Error),

    /// Temp file could not be renamed over the target.
    #[error("failed to complete save of {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Hint shown after the error message.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Io { operation, .. } if *operation == "read" => {
                Some("Check that the session file exists and is readable.")
            }
            Self::Io { .. } | Self::AtomicWriteFailed { .. } => {
                Some("Check that the session directory is writable and has free space.")
            }
            Self::InvalidFormat { .. } => {
                Some("Delete the session file or pass --session to start a fresh one.")
            }
            Self::UnsupportedVersion { .. } => Some("Update agri-shield to open this session."),
            Self::Serialization(_) => None,
        }
    }
}

/// Result type alias for session file operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
