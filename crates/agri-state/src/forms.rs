//! Form filling sessions.
//!
//! A [`FormSession`] is the in-progress draft behind the form renderer: the
//! selected form, the current wizard step and the values entered so far. In
//! update mode it also tracks the fields a reviewer flagged; each flag clears
//! as soon as its field is edited and submission is refused while any remain.

use std::collections::{BTreeMap, BTreeSet};

use agri_model::{
    FORM_STEPS, FieldSpec, FieldValue, FormStep, FormType, IdPrefix, RecordId, STEP_COUNT,
    StatusMachine, Submission, SubmissionStatus, find_field, validate_field,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StateError};
use crate::events::StateEvent;
use crate::store::AppState;

/// Draft of a form being filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSession {
    form_type: FormType,
    step: usize,
    #[serde(default)]
    values: BTreeMap<String, FieldValue>,
    /// Submission being corrected, in update mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updating: Option<RecordId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    flagged: BTreeSet<String>,
}

impl FormSession {
    pub fn new(form_type: FormType) -> Self {
        Self {
            form_type,
            step: 1,
            values: BTreeMap::new(),
            updating: None,
            flagged: BTreeSet::new(),
        }
    }

    /// Reopen a returned submission with its values and reviewer flags.
    pub fn for_update(submission: &Submission) -> Self {
        Self {
            form_type: submission.form_type,
            step: 1,
            values: submission.values.clone(),
            updating: Some(submission.id.clone()),
            flagged: submission.update_fields.clone(),
        }
    }

    pub fn form_type(&self) -> FormType {
        self.form_type
    }

    /// Current step, 1-based.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current_step(&self) -> &'static FormStep {
        &FORM_STEPS[self.step.clamp(1, STEP_COUNT) - 1]
    }

    pub fn progress_percent(&self) -> u8 {
        u8::try_from(self.step * 100 / STEP_COUNT).unwrap_or(100)
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn updating(&self) -> Option<&RecordId> {
        self.updating.as_ref()
    }

    pub fn is_update(&self) -> bool {
        self.updating.is_some()
    }

    /// Fields still flagged for update.
    pub fn flagged_fields(&self) -> &BTreeSet<String> {
        &self.flagged
    }

    pub fn needs_update(&self, name: &str) -> bool {
        self.is_update() && self.flagged.contains(name)
    }

    /// Fields of the current step, optionally only the flagged ones.
    pub fn visible_fields(&self, only_flagged: bool) -> Vec<&'static FieldSpec> {
        self.current_step()
            .fields
            .iter()
            .filter(|spec| !only_flagged || self.needs_update(spec.name))
            .collect()
    }

    /// Store a value after checking it against the schema.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<()> {
        validate_field(name, &value)?;
        self.values.insert(name.to_string(), value);
        if self.flagged.remove(name) {
            debug!(field = name, remaining = self.flagged.len(), "flagged field updated");
        }
        Ok(())
    }

    /// Parse command-line input for `name` and store it.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<()> {
        let spec = find_field(name).ok_or_else(|| {
            StateError::Model(agri_model::ModelError::InvalidField {
                field: name.to_string(),
                reason: "unknown field".to_string(),
            })
        })?;
        let value = spec.parse_value(raw)?;
        self.set_value(name, value)
    }

    pub fn clear_value(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub fn next_step(&mut self) -> usize {
        self.go_to_step(self.step + 1)
    }

    pub fn previous_step(&mut self) -> usize {
        self.go_to_step(self.step.saturating_sub(1))
    }

    /// Jump to `step`, clamped to the wizard's range.
    pub fn go_to_step(&mut self, step: usize) -> usize {
        self.step = step.clamp(1, STEP_COUNT);
        self.step
    }
}

// =============================================================================
// STORE OPERATIONS
// =============================================================================

impl AppState {
    /// Select `form_type`, open the renderer and start an empty draft.
    pub fn start_form(&mut self, form_type: FormType) {
        self.navigate_to_form(form_type);
        *self.form_draft_slot() = Some(FormSession::new(form_type));
        self.commit(StateEvent::FormDraftChanged);
    }

    /// Reopen a submission that was returned for update or rejected.
    pub fn start_form_update(&mut self, id: &RecordId) -> Result<()> {
        let submission = self
            .find_submission(id)
            .ok_or_else(|| StateError::SubmissionNotFound(id.clone()))?;
        if !matches!(
            submission.status,
            SubmissionStatus::PendingUpdate | SubmissionStatus::Rejected
        ) {
            return Err(StateError::NotAwaitingUpdate {
                id: id.clone(),
                status: submission.status.as_str().to_string(),
            });
        }
        let session = FormSession::for_update(submission);
        self.navigate_to_form(session.form_type());
        *self.form_draft_slot() = Some(session);
        self.commit(StateEvent::FormDraftChanged);
        Ok(())
    }

    /// Apply `edit` to the current draft.
    pub fn edit_form_draft<T>(
        &mut self,
        edit: impl FnOnce(&mut FormSession) -> Result<T>,
    ) -> Result<T> {
        let draft = self
            .form_draft_slot()
            .as_mut()
            .ok_or(StateError::NoActiveForm)?;
        let out = edit(draft)?;
        self.commit(StateEvent::FormDraftChanged);
        Ok(out)
    }

    pub fn discard_form_draft(&mut self) -> Option<FormSession> {
        let draft = self.form_draft_slot().take();
        if draft.is_some() {
            self.commit(StateEvent::FormDraftChanged);
        }
        draft
    }

    /// File the current draft.
    ///
    /// A fresh draft becomes a new pending submission. An update draft
    /// replaces the returned submission's values and sends it back to
    /// pending. Refused while flagged fields remain; the draft is kept.
    pub fn submit_form(&mut self) -> Result<RecordId> {
        let draft = self.form_draft().ok_or(StateError::NoActiveForm)?;
        if draft.is_update() && !draft.flagged_fields().is_empty() {
            return Err(StateError::UpdatePending(
                draft.flagged_fields().iter().cloned().collect(),
            ));
        }

        let id = match draft.updating().cloned() {
            Some(id) => {
                let values = draft.values().clone();
                self.resubmit(&id, values)?;
                id
            }
            None => {
                let form_type = draft.form_type();
                let values = draft.values().clone();
                let id = self.next_id(IdPrefix::Submission);
                let submission =
                    Submission::new(id.clone(), form_type, Utc::now().date_naive(), values);
                self.push_submission(submission);
                id
            }
        };

        *self.form_draft_slot() = None;
        self.commit(StateEvent::FormDraftChanged);
        info!(submission = %id, "form submitted");
        Ok(id)
    }

    fn resubmit(&mut self, id: &RecordId, values: BTreeMap<String, FieldValue>) -> Result<()> {
        let outcome = self.update_submission_status(id, SubmissionStatus::Pending)?;
        if !outcome.is_applied() {
            return Err(StateError::SubmissionNotFound(id.clone()));
        }
        if let Some(submission) = self.submissions_mut().iter_mut().find(|s| &s.id == id) {
            submission.values = values;
            submission.update_fields.clear();
            submission.submitted_on = Utc::now().date_naive();
        }
        Ok(())
    }
}
