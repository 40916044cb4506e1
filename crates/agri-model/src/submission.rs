//! Forms-portal submissions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::forms::{FieldValue, FormType};
use crate::ids::RecordId;
use crate::status::{StatusMachine, SubmissionStatus};

/// A filed form awaiting or past review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: RecordId,
    pub form_type: FormType,
    pub submitted_on: NaiveDate,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
    /// Fields the reviewer asked the applicant to correct.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub update_fields: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
}

impl Submission {
    pub fn new(
        id: RecordId,
        form_type: FormType,
        submitted_on: NaiveDate,
        values: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            id,
            form_type,
            submitted_on,
            status: SubmissionStatus::initial(),
            values,
            update_fields: BTreeSet::new(),
            review_comment: None,
        }
    }

    /// Label shown in the submissions list.
    pub fn label(&self) -> &'static str {
        self.form_type.submission_label()
    }

    /// Case-insensitive match on identifier or form label.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.id.as_str().to_lowercase().contains(&needle)
            || self.label().to_lowercase().contains(&needle)
    }
}
