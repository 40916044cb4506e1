//! Tests for agri-model types.

use agri_model::{
    FirStatus, InspectionStatus, LabSampleStatus, ModelError, SeizureStatus, StatusMachine,
    SubmissionStatus, TABS, TabId, UserRole, allowed_tabs_for, fallback_tab,
};
use proptest::prelude::*;

fn rank_of<S: StatusMachine>(status: S) -> usize {
    S::all()
        .iter()
        .position(|candidate| *candidate == status)
        .unwrap_or(usize::MAX)
}

fn check_forward_only<S: StatusMachine>(from: S, to: S) {
    let result = from.transition(to);
    if from == to {
        assert!(result.is_err(), "{from} -> {to} should be rejected");
    }
    if let Ok(next) = result {
        assert_eq!(next, to);
        assert!(
            !to.can_transition_to(from),
            "{from} -> {to} is reversible"
        );
    }
}

fn any_role() -> impl Strategy<Value = UserRole> {
    prop::sample::select(UserRole::all().to_vec())
}

fn any_seizure_status() -> impl Strategy<Value = SeizureStatus> {
    prop::sample::select(SeizureStatus::all().to_vec())
}

fn any_lab_status() -> impl Strategy<Value = LabSampleStatus> {
    prop::sample::select(LabSampleStatus::all().to_vec())
}

fn any_fir_status() -> impl Strategy<Value = FirStatus> {
    prop::sample::select(FirStatus::all().to_vec())
}

fn any_inspection_status() -> impl Strategy<Value = InspectionStatus> {
    prop::sample::select(InspectionStatus::all().to_vec())
}

proptest! {
    #[test]
    fn allowed_tabs_are_the_static_list_filtered_by_role(role in any_role()) {
        let expected: Vec<TabId> = TABS
            .iter()
            .filter(|tab| tab.allowed_roles.contains(&role))
            .map(|tab| tab.id)
            .collect();
        let actual: Vec<TabId> = allowed_tabs_for(role).iter().map(|tab| tab.id).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn fallback_is_always_an_allowed_tab(role in any_role()) {
        let allowed = allowed_tabs_for(role);
        let fallback = fallback_tab(&allowed).unwrap();
        prop_assert!(fallback.definition().allows(role));
    }

    #[test]
    fn seizure_statuses_only_move_forward(
        from in any_seizure_status(),
        to in any_seizure_status(),
    ) {
        check_forward_only(from, to);
        prop_assert_eq!(from.can_transition_to(to), rank_of(to) > rank_of(from));
    }

    #[test]
    fn lab_statuses_only_move_forward(from in any_lab_status(), to in any_lab_status()) {
        check_forward_only(from, to);
    }

    #[test]
    fn fir_statuses_only_move_forward(from in any_fir_status(), to in any_fir_status()) {
        check_forward_only(from, to);
        prop_assert_eq!(from.can_transition_to(to), rank_of(to) > rank_of(from));
    }

    #[test]
    fn inspection_statuses_only_move_forward(
        from in any_inspection_status(),
        to in any_inspection_status(),
    ) {
        check_forward_only(from, to);
    }
}

#[test]
fn closed_fir_cannot_reopen() {
    assert!(FirStatus::Closed.is_terminal());
    let err = FirStatus::Closed.transition(FirStatus::Draft).unwrap_err();
    assert_eq!(
        err,
        ModelError::IllegalTransition {
            entity: "FIR case",
            from: "closed".to_string(),
            to: "draft".to_string(),
        }
    );
}

#[test]
fn lab_outcomes_are_sibling_terminals() {
    assert!(LabSampleStatus::Violation.is_terminal());
    assert!(LabSampleStatus::Compliant.is_terminal());
    assert!(
        LabSampleStatus::Violation
            .transition(LabSampleStatus::Compliant)
            .is_err()
    );
    assert!(
        LabSampleStatus::Completed
            .transition(LabSampleStatus::Violation)
            .is_ok()
    );
}

#[test]
fn returned_submission_goes_back_to_pending() {
    let status = SubmissionStatus::Pending
        .transition(SubmissionStatus::UnderReview)
        .and_then(|s| s.transition(SubmissionStatus::PendingUpdate))
        .and_then(|s| s.transition(SubmissionStatus::Pending))
        .unwrap();
    assert_eq!(status, SubmissionStatus::Pending);
    assert!(
        SubmissionStatus::Pending
            .transition(SubmissionStatus::Approved)
            .is_err()
    );
}

#[test]
fn rejected_submission_can_be_resubmitted_but_approval_is_final() {
    assert!(SubmissionStatus::Rejected.can_transition_to(SubmissionStatus::Pending));
    assert!(
        SubmissionStatus::Rejected
            .transition(SubmissionStatus::Approved)
            .is_err()
    );
    assert!(SubmissionStatus::Approved.is_terminal());
    assert!(!SubmissionStatus::Rejected.is_terminal());
}

#[test]
fn statuses_parse_from_their_identifiers() {
    assert_eq!(
        "report-generated".parse::<SeizureStatus>().unwrap(),
        SeizureStatus::ReportGenerated
    );
    assert_eq!(
        "Pending-Court".parse::<FirStatus>().unwrap(),
        FirStatus::PendingCourt
    );
    assert!("archived".parse::<FirStatus>().is_err());
}
