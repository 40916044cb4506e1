//! Record identifiers.
//!
//! Identifiers are `<PREFIX>-<millis>`, taken from the creation time. The
//! generator keeps the last value it issued so two records created within the
//! same millisecond still get distinct identifiers.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifier of any stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier prefix per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Inspection,
    Seizure,
    LabSample,
    FirCase,
    Submission,
}

impl IdPrefix {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inspection => "INS",
            Self::Seizure => "SEZ",
            Self::LabSample => "LAB",
            Self::FirCase => "FIR",
            Self::Submission => "SUB",
        }
    }
}

/// Creation-time identifier source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    last_issued: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier stamped with the current time.
    pub fn next_id(&mut self, prefix: IdPrefix) -> RecordId {
        self.next_at(prefix, Utc::now().timestamp_millis())
    }

    /// Next identifier for a given clock reading.
    pub fn next_at(&mut self, prefix: IdPrefix, millis: i64) -> RecordId {
        let value = millis.max(self.last_issued.saturating_add(1));
        self.last_issued = value;
        RecordId(format!("{}-{}", prefix.as_str(), value))
    }
}
