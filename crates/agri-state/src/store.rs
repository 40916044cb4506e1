//! The application state container.
//!
//! [`AppState`] owns the session UI state (role, active tab, selected form)
//! and every record collection. All mutation goes through its methods, each
//! of which bumps the revision, appends to the audit trail where a record or
//! role changes, and publishes a [`StateEvent`].

use std::sync::mpsc::Receiver;

use agri_model::{
    FirCase, FirStatus, FormType, IdGenerator, IdPrefix, InspectionStatus, InspectionTask,
    LabSample, LabSampleStatus, NewFirCase, NewInspectionTask, NewLabSample, RecordId, Seizure,
    SeizureDetails, SeizureStatus, StatusMachine, Submission, SubmissionStatus, TabDefinition,
    TabId, UserRole, allowed_tabs_for, fallback_tab,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::audit::AuditLog;
use crate::error::Result;
use crate::events::{RecordKind, StateEvent, Subscribers};
use crate::forms::FormSession;

/// Outcome of a status update by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// No record carries the identifier; nothing changed.
    NotFound,
}

impl UpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Serializable part of the state, as written to session files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateData {
    pub(crate) user_role: UserRole,
    pub(crate) active_tab: TabId,
    pub(crate) selected_form_type: Option<FormType>,
    pub(crate) inspection_tasks: Vec<InspectionTask>,
    pub(crate) seizures: Vec<Seizure>,
    pub(crate) lab_samples: Vec<LabSample>,
    pub(crate) fir_cases: Vec<FirCase>,
    pub(crate) submissions: Vec<Submission>,
    pub(crate) form_draft: Option<FormSession>,
    pub(crate) audit_log: AuditLog,
    pub(crate) ids: IdGenerator,
}

// =============================================================================
// STATUS-TRACKED RECORDS
// =============================================================================

/// Record with an identifier and a status machine.
pub(crate) trait Tracked {
    type Status: StatusMachine;
    const KIND: RecordKind;

    fn id(&self) -> &RecordId;
    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);
}

macro_rules! tracked {
    ($record:ty, $status:ty, $kind:expr) => {
        impl Tracked for $record {
            type Status = $status;
            const KIND: RecordKind = $kind;

            fn id(&self) -> &RecordId {
                &self.id
            }

            fn status(&self) -> Self::Status {
                self.status
            }

            fn set_status(&mut self, status: Self::Status) {
                self.status = status;
            }
        }
    };
}

tracked!(InspectionTask, InspectionStatus, RecordKind::InspectionTask);
tracked!(Seizure, SeizureStatus, RecordKind::Seizure);
tracked!(LabSample, LabSampleStatus, RecordKind::LabSample);
tracked!(FirCase, FirStatus, RecordKind::FirCase);
tracked!(Submission, SubmissionStatus, RecordKind::Submission);

/// Move the matching record to `next`, returning its previous status.
///
/// `Ok(None)` when no record matches. An illegal transition leaves the record
/// untouched.
fn transition_record<R: Tracked>(
    records: &mut [R],
    id: &RecordId,
    next: R::Status,
) -> Result<Option<R::Status>> {
    let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
        return Ok(None);
    };
    let previous = record.status();
    record.set_status(previous.transition(next)?);
    Ok(Some(previous))
}

// =============================================================================
// APP STATE
// =============================================================================

/// Owned application state.
#[derive(Debug, Default)]
pub struct AppState {
    data: StateData,
    revision: u64,
    subscribers: Subscribers,
}

impl AppState {
    /// Fresh session: DAO role, dashboard tab, empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a saved session. The active tab is reconciled against the
    /// restored role without publishing.
    pub fn from_data(data: StateData) -> Self {
        let mut state = Self {
            data,
            revision: 0,
            subscribers: Subscribers::default(),
        };
        if let Some(fallback) = state.disallowed_tab_fallback() {
            state.data.active_tab = fallback;
        }
        state
    }

    pub fn data(&self) -> &StateData {
        &self.data
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive every subsequent [`StateEvent`].
    pub fn subscribe(&mut self) -> Receiver<StateEvent> {
        self.subscribers.subscribe()
    }

    // ===== ACCESSORS =====

    pub fn user_role(&self) -> UserRole {
        self.data.user_role
    }

    pub fn active_tab(&self) -> TabId {
        self.data.active_tab
    }

    pub fn selected_form_type(&self) -> Option<FormType> {
        self.data.selected_form_type
    }

    pub fn inspection_tasks(&self) -> &[InspectionTask] {
        &self.data.inspection_tasks
    }

    pub fn seizures(&self) -> &[Seizure] {
        &self.data.seizures
    }

    pub fn lab_samples(&self) -> &[LabSample] {
        &self.data.lab_samples
    }

    pub fn fir_cases(&self) -> &[FirCase] {
        &self.data.fir_cases
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.data.submissions
    }

    pub fn form_draft(&self) -> Option<&FormSession> {
        self.data.form_draft.as_ref()
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.data.audit_log
    }

    pub fn find_inspection_task(&self, id: &RecordId) -> Option<&InspectionTask> {
        self.data.inspection_tasks.iter().find(|r| &r.id == id)
    }

    pub fn find_seizure(&self, id: &RecordId) -> Option<&Seizure> {
        self.data.seizures.iter().find(|r| &r.id == id)
    }

    pub fn find_lab_sample(&self, id: &RecordId) -> Option<&LabSample> {
        self.data.lab_samples.iter().find(|r| &r.id == id)
    }

    pub fn find_fir_case(&self, id: &RecordId) -> Option<&FirCase> {
        self.data.fir_cases.iter().find(|r| &r.id == id)
    }

    pub fn find_submission(&self, id: &RecordId) -> Option<&Submission> {
        self.data.submissions.iter().find(|r| &r.id == id)
    }

    // ===== NAVIGATION =====

    /// Tabs the current role may open, in sidebar order.
    pub fn allowed_tabs(&self) -> Vec<&'static TabDefinition> {
        allowed_tabs_for(self.data.user_role)
    }

    /// Select a tab. A tab the role may not open resolves to the role's
    /// fallback tab; only the resolved tab is stored and published.
    pub fn set_active_tab(&mut self, tab: TabId) {
        let target = if tab.definition().allows(self.data.user_role) {
            tab
        } else {
            let fallback = fallback_tab(&self.allowed_tabs()).unwrap_or(self.data.active_tab);
            debug!(
                requested = %tab,
                to = %fallback,
                role = %self.data.user_role,
                "tab not allowed for role, falling back"
            );
            fallback
        };
        if self.data.active_tab != target {
            self.data.active_tab = target;
            debug!(tab = %target, "active tab changed");
            self.commit(StateEvent::TabChanged(target));
        }
    }

    /// Switch the simulated identity and re-derive the allowed tabs.
    pub fn set_user_role(&mut self, role: UserRole) {
        if self.data.user_role == role {
            return;
        }
        let previous = self.data.user_role;
        self.data.user_role = role;
        debug!(from = %previous, to = %role, "user role changed");
        self.audit("User role switched", format!("{previous} -> {role}"));
        self.commit(StateEvent::RoleChanged(role));
        self.reconcile_active_tab();
    }

    pub fn set_selected_form_type(&mut self, form_type: Option<FormType>) {
        if self.data.selected_form_type != form_type {
            self.data.selected_form_type = form_type;
            self.commit(StateEvent::SelectedFormChanged(form_type));
        }
    }

    /// Select a form and open the form renderer in one step.
    pub fn navigate_to_form(&mut self, form_type: FormType) {
        self.set_selected_form_type(Some(form_type));
        self.set_active_tab(TabId::FormRenderer);
    }

    fn disallowed_tab_fallback(&self) -> Option<TabId> {
        let allowed = self.allowed_tabs();
        if allowed.iter().any(|tab| tab.id == self.data.active_tab) {
            None
        } else {
            fallback_tab(&allowed)
        }
    }

    fn reconcile_active_tab(&mut self) {
        if let Some(fallback) = self.disallowed_tab_fallback() {
            debug!(
                from = %self.data.active_tab,
                to = %fallback,
                role = %self.data.user_role,
                "active tab not allowed for role, falling back"
            );
            self.data.active_tab = fallback;
            self.commit(StateEvent::TabChanged(fallback));
        }
    }

    // ===== RECORDS =====

    pub fn add_inspection_task(&mut self, draft: NewInspectionTask) -> RecordId {
        let id = self.data.ids.next_id(IdPrefix::Inspection);
        let task = InspectionTask::from_draft(id.clone(), draft, InspectionStatus::initial());
        let details = format!("Target: {} {}", task.location, task.target_type);
        self.data.inspection_tasks.push(task);
        self.record_added(RecordKind::InspectionTask, &id, "scheduled", details);
        id
    }

    pub fn add_seizure(&mut self, details: SeizureDetails) -> RecordId {
        let id = self.data.ids.next_id(IdPrefix::Seizure);
        let audit_details = format!("Location: {}", details.geo_location);
        self.data.seizures.push(Seizure {
            id: id.clone(),
            details,
            status: SeizureStatus::initial(),
        });
        self.record_added(RecordKind::Seizure, &id, "logged", audit_details);
        id
    }

    pub fn add_lab_sample(&mut self, draft: NewLabSample) -> RecordId {
        let id = self.data.ids.next_id(IdPrefix::LabSample);
        let audit_details = format!("Destination: {}", draft.lab_destination);
        self.data
            .lab_samples
            .push(LabSample::from_draft(id.clone(), draft, LabSampleStatus::initial()));
        self.record_added(RecordKind::LabSample, &id, "prepared", audit_details);
        id
    }

    pub fn add_fir_case(&mut self, draft: NewFirCase) -> RecordId {
        let id = self.data.ids.next_id(IdPrefix::FirCase);
        let audit_details = draft.violation_type.clone();
        self.data
            .fir_cases
            .push(FirCase::from_draft(id.clone(), draft, FirStatus::initial()));
        self.record_added(RecordKind::FirCase, &id, "drafted", audit_details);
        id
    }

    pub(crate) fn push_submission(&mut self, submission: Submission) {
        let id = submission.id.clone();
        let details = submission.label().to_string();
        self.data.submissions.push(submission);
        self.record_added(RecordKind::Submission, &id, "filed", details);
    }

    pub(crate) fn next_id(&mut self, prefix: IdPrefix) -> RecordId {
        self.data.ids.next_id(prefix)
    }

    // ===== STATUS UPDATES =====

    pub fn update_inspection_task_status(
        &mut self,
        id: &RecordId,
        status: InspectionStatus,
    ) -> Result<UpdateOutcome> {
        let result = transition_record(&mut self.data.inspection_tasks, id, status);
        self.finish_update::<InspectionTask>(id, status, result)
    }

    pub fn update_seizure_status(
        &mut self,
        id: &RecordId,
        status: SeizureStatus,
    ) -> Result<UpdateOutcome> {
        let result = transition_record(&mut self.data.seizures, id, status);
        self.finish_update::<Seizure>(id, status, result)
    }

    pub fn update_lab_sample_status(
        &mut self,
        id: &RecordId,
        status: LabSampleStatus,
    ) -> Result<UpdateOutcome> {
        let result = transition_record(&mut self.data.lab_samples, id, status);
        self.finish_update::<LabSample>(id, status, result)
    }

    pub fn update_fir_case_status(
        &mut self,
        id: &RecordId,
        status: FirStatus,
    ) -> Result<UpdateOutcome> {
        let result = transition_record(&mut self.data.fir_cases, id, status);
        self.finish_update::<FirCase>(id, status, result)
    }

    pub fn update_submission_status(
        &mut self,
        id: &RecordId,
        status: SubmissionStatus,
    ) -> Result<UpdateOutcome> {
        let result = transition_record(&mut self.data.submissions, id, status);
        self.finish_update::<Submission>(id, status, result)
    }

    pub(crate) fn submissions_mut(&mut self) -> &mut Vec<Submission> {
        &mut self.data.submissions
    }

    pub(crate) fn form_draft_slot(&mut self) -> &mut Option<FormSession> {
        &mut self.data.form_draft
    }

    fn finish_update<R: Tracked>(
        &mut self,
        id: &RecordId,
        next: R::Status,
        result: Result<Option<R::Status>>,
    ) -> Result<UpdateOutcome> {
        match result {
            Ok(Some(previous)) => {
                debug!(kind = %R::KIND, id = %id, from = %previous, to = %next, "status updated");
                self.audit(
                    format!("{} {} status updated to {}", R::KIND, id, next),
                    format!("{previous} -> {next}"),
                );
                self.commit(StateEvent::StatusChanged {
                    kind: R::KIND,
                    id: id.clone(),
                    from: previous.as_str(),
                    to: next.as_str(),
                });
                Ok(UpdateOutcome::Applied)
            }
            Ok(None) => {
                warn!(kind = %R::KIND, id = %id, "status update ignored, record not found");
                Ok(UpdateOutcome::NotFound)
            }
            Err(err) => {
                warn!(kind = %R::KIND, id = %id, error = %err, "status update rejected");
                Err(err)
            }
        }
    }

    // ===== BOOKKEEPING =====

    fn record_added(&mut self, kind: RecordKind, id: &RecordId, verb: &str, details: String) {
        debug!(kind = %kind, id = %id, "record added");
        self.audit(format!("{kind} {id} {verb}"), details);
        self.commit(StateEvent::RecordAdded {
            kind,
            id: id.clone(),
        });
    }

    pub(crate) fn audit(&mut self, action: impl Into<String>, details: impl Into<String>) {
        let role = self.data.user_role;
        self.data.audit_log.record(role, action, details);
    }

    pub(crate) fn commit(&mut self, event: StateEvent) {
        self.revision += 1;
        self.subscribers.publish(&event);
    }
}
