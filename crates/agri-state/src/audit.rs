//! Audit trail of store mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agri_model::UserRole;

/// One audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub role: UserRole,
    pub action: String,
    pub details: String,
}

/// Append-only list of audit entries, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn record(&mut self, role: UserRole, action: impl Into<String>, details: impl Into<String>) {
        self.entries.push(AuditEntry {
            at: Utc::now(),
            role,
            action: action.into(),
            details: details.into(),
        });
    }

    /// Most recent entries first, at most `limit` of them.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
