//! Submission review: listing, filtering and reviewer actions.

use std::collections::BTreeSet;

use agri_model::{RecordId, Submission, SubmissionStatus, find_field};
use tracing::info;

use crate::error::{Result, StateError};
use crate::store::{AppState, UpdateOutcome};

/// Submissions list filter. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    /// Substring of the form label, case-insensitive.
    pub form_type: Option<String>,
    /// Free-text search over identifier and form label.
    pub search: Option<String>,
}

impl SubmissionFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        let status_ok = self.status.is_none_or(|status| submission.status == status);
        let type_ok = self.form_type.as_deref().is_none_or(|needle| {
            submission
                .label()
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|needle| submission.matches_search(needle));
        status_ok && type_ok && search_ok
    }
}

impl AppState {
    pub fn filter_submissions(&self, filter: &SubmissionFilter) -> Vec<&Submission> {
        self.submissions()
            .iter()
            .filter(|submission| filter.matches(submission))
            .collect()
    }

    pub fn pending_submission_count(&self) -> usize {
        self.submissions()
            .iter()
            .filter(|submission| submission.status == SubmissionStatus::Pending)
            .count()
    }

    /// Move every pending submission under review. Returns how many moved.
    pub fn batch_process_submissions(&mut self) -> Result<usize> {
        let pending: Vec<RecordId> = self
            .submissions()
            .iter()
            .filter(|submission| submission.status == SubmissionStatus::Pending)
            .map(|submission| submission.id.clone())
            .collect();
        for id in &pending {
            let _ = self.update_submission_status(id, SubmissionStatus::UnderReview)?;
        }
        info!(count = pending.len(), "batch processed pending submissions");
        Ok(pending.len())
    }

    /// Send a submission under review back to the applicant with the fields
    /// that need correcting.
    pub fn return_submission_for_update(
        &mut self,
        id: &RecordId,
        fields: &[String],
        comment: Option<String>,
    ) -> Result<UpdateOutcome> {
        let mut flagged = BTreeSet::new();
        for name in fields {
            let spec = find_field(name).ok_or_else(|| {
                StateError::Model(agri_model::ModelError::InvalidField {
                    field: name.clone(),
                    reason: "unknown field".to_string(),
                })
            })?;
            flagged.insert(spec.name.to_string());
        }

        let outcome = self.update_submission_status(id, SubmissionStatus::PendingUpdate)?;
        if outcome.is_applied()
            && let Some(submission) = self.submissions_mut().iter_mut().find(|s| &s.id == id)
        {
            submission.update_fields = flagged;
            submission.review_comment = comment;
        }
        Ok(outcome)
    }

    pub fn approve_submission(&mut self, id: &RecordId) -> Result<UpdateOutcome> {
        self.update_submission_status(id, SubmissionStatus::Approved)
    }

    pub fn reject_submission(
        &mut self,
        id: &RecordId,
        comment: Option<String>,
    ) -> Result<UpdateOutcome> {
        let outcome = self.update_submission_status(id, SubmissionStatus::Rejected)?;
        if outcome.is_applied()
            && let Some(submission) = self.submissions_mut().iter_mut().find(|s| &s.id == id)
        {
            submission.review_comment = comment;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_model::FormType;

    fn with_submissions() -> (AppState, RecordId, RecordId) {
        let mut state = AppState::new();
        state.start_form(FormType::FormA1);
        let first = state.submit_form().unwrap();
        state.start_form(FormType::InspectionInsecticide);
        let second = state.submit_form().unwrap();
        (state, first, second)
    }

    #[test]
    fn batch_moves_only_pending() {
        let (mut state, first, _) = with_submissions();
        state.batch_process_submissions().unwrap();
        state.approve_submission(&first).unwrap();

        assert_eq!(state.pending_submission_count(), 0);
        assert_eq!(state.batch_process_submissions().unwrap(), 0);
        assert_eq!(
            state.find_submission(&first).unwrap().status,
            SubmissionStatus::Approved
        );
    }

    #[test]
    fn filter_combines_status_type_and_search() {
        let (mut state, first, second) = with_submissions();
        let _ = state
            .update_submission_status(&second, SubmissionStatus::UnderReview)
            .unwrap();

        let pending = SubmissionFilter {
            status: Some(SubmissionStatus::Pending),
            ..SubmissionFilter::default()
        };
        let ids: Vec<&RecordId> = state
            .filter_submissions(&pending)
            .iter()
            .map(|s| &s.id)
            .collect();
        assert_eq!(ids, vec![&first]);

        let insecticide = SubmissionFilter {
            form_type: Some("insecticide".to_string()),
            search: Some("sub-".to_string()),
            ..SubmissionFilter::default()
        };
        assert_eq!(state.filter_submissions(&insecticide).len(), 1);
    }

    #[test]
    fn return_for_update_rejects_unknown_fields() {
        let (mut state, first, _) = with_submissions();
        state.batch_process_submissions().unwrap();
        let err = state
            .return_submission_for_update(&first, &["shoeSize".to_string()], None)
            .unwrap_err();
        assert!(err.to_string().contains("shoeSize"));
        assert_eq!(
            state.find_submission(&first).unwrap().status,
            SubmissionStatus::UnderReview
        );
    }
}
