//! Tests for the application state container.

use agri_model::{
    AuthenticityScore, FirStatus, FormType, NewFirCase, RecordId, SeizureDetails, SeizureStatus,
    StatusMachine, TABS, TabId, UserRole,
};
use agri_state::{AppState, RecordKind, StateEvent, UpdateOutcome};
use chrono::Utc;
use proptest::prelude::*;

fn seizure_details(batch: &str) -> SeizureDetails {
    SeizureDetails {
        company: "Bayer".to_string(),
        product: "Confidor".to_string(),
        batch_number: batch.to_string(),
        authenticity_score: AuthenticityScore::new(25).unwrap(),
        issues: vec!["Missing hologram".to_string()],
        recommendation: "Suspected Counterfeit".to_string(),
        geo_location: "Sangli Market".to_string(),
        timestamp: Utc::now(),
        quantity: Some("50 units".to_string()),
        estimated_value: Some("₹8,250".to_string()),
        witness_name: Some("Shop Owner".to_string()),
        evidence_photos: Vec::new(),
        video_evidence: None,
    }
}

fn any_role() -> impl Strategy<Value = UserRole> {
    prop::sample::select(UserRole::all().to_vec())
}

fn any_tab() -> impl Strategy<Value = TabId> {
    prop::sample::select(TABS.iter().map(|tab| tab.id).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn allowed_tabs_follow_the_role(start in any_role(), role in any_role()) {
        let mut state = AppState::new();
        state.set_user_role(start);
        state.set_user_role(role);

        let expected: Vec<TabId> = TABS
            .iter()
            .filter(|tab| tab.allowed_roles.contains(&role))
            .map(|tab| tab.id)
            .collect();
        let actual: Vec<TabId> = state.allowed_tabs().iter().map(|tab| tab.id).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn active_tab_is_always_allowed(role in any_role(), tab in any_tab()) {
        let mut state = AppState::new();
        state.set_user_role(role);
        state.set_active_tab(tab);
        let active = state.active_tab();
        prop_assert!(state.allowed_tabs().iter().any(|t| t.id == active));
        if tab.definition().allows(role) {
            prop_assert_eq!(active, tab);
        }
    }

    #[test]
    fn generated_ids_are_unique(count in 1usize..40) {
        let mut state = AppState::new();
        let mut ids: Vec<RecordId> = (0..count)
            .map(|n| state.add_seizure(seizure_details(&format!("B-{n}"))))
            .collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }
}

#[test]
fn add_seizure_appends_one_pending_record() {
    let mut state = AppState::new();
    let before = state.seizures().len();
    let id = state.add_seizure(seizure_details("B-1"));

    assert_eq!(state.seizures().len(), before + 1);
    let seizure = state.find_seizure(&id).unwrap();
    assert_eq!(seizure.status, SeizureStatus::Pending);
    assert!(id.as_str().starts_with("SEZ-"));
}

#[test]
fn update_changes_exactly_one_record() {
    let mut state = AppState::new();
    let a = state.add_seizure(seizure_details("B-1"));
    let b = state.add_seizure(seizure_details("B-2"));
    let c = state.add_seizure(seizure_details("B-3"));

    let outcome = state
        .update_seizure_status(&b, SeizureStatus::Dispatched)
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Applied);

    let statuses: Vec<(RecordId, SeizureStatus)> = state
        .seizures()
        .iter()
        .map(|s| (s.id.clone(), s.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (a, SeizureStatus::Pending),
            (b, SeizureStatus::Dispatched),
            (c, SeizureStatus::Pending),
        ]
    );
}

#[test]
fn update_of_missing_id_is_a_no_op() {
    let mut state = AppState::new();
    state.add_seizure(seizure_details("B-1"));
    let before = state.seizures().to_vec();
    let revision = state.revision();

    let outcome = state
        .update_seizure_status(&RecordId::from("SEZ-0"), SeizureStatus::Dispatched)
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NotFound);
    assert_eq!(state.seizures(), before.as_slice());
    assert_eq!(state.revision(), revision);
}

#[test]
fn closed_fir_cannot_be_reopened() {
    let mut state = AppState::new();
    let id = state.add_fir_case(NewFirCase {
        seizure_id: None,
        lab_report_id: "LAB-1".to_string(),
        violation_type: "Misbranding".to_string(),
        accused: "Sai Agro Traders".to_string(),
        location: "Kolhapur".to_string(),
        details: None,
    });
    assert_eq!(state.find_fir_case(&id).unwrap().status, FirStatus::initial());
    state.update_fir_case_status(&id, FirStatus::Closed).unwrap();

    assert!(state.update_fir_case_status(&id, FirStatus::Draft).is_err());
    assert_eq!(state.find_fir_case(&id).unwrap().status, FirStatus::Closed);
}

#[test]
fn navigate_to_form_selects_form_and_opens_renderer() {
    let mut state = AppState::new();
    state.navigate_to_form(FormType::FormA1);

    assert_eq!(state.selected_form_type(), Some(FormType::FormA1));
    assert_eq!(state.active_tab(), TabId::FormRenderer);
}

#[test]
fn losing_access_falls_back_to_first_visible_tab() {
    let mut state = AppState::new();
    state.set_active_tab(TabId::InspectionPlanning);
    assert_eq!(state.active_tab(), TabId::InspectionPlanning);

    state.set_user_role(UserRole::Farmer);
    assert_eq!(state.active_tab(), TabId::FormsDashboard);

    state.set_user_role(UserRole::LabCoordinator);
    assert_eq!(state.active_tab(), TabId::LabInterface);
}

#[test]
fn disallowed_tab_on_the_fallback_changes_nothing() {
    let mut state = AppState::new();
    state.set_user_role(UserRole::LegalOfficer);
    assert_eq!(state.active_tab(), TabId::LegalModule);
    let events = state.subscribe();
    let revision = state.revision();

    state.set_active_tab(TabId::InspectionPlanning);

    assert_eq!(state.active_tab(), TabId::LegalModule);
    assert_eq!(state.revision(), revision);
    assert_eq!(events.try_iter().count(), 0);
}

#[test]
fn disallowed_tab_publishes_only_the_fallback() {
    let mut state = AppState::new();
    state.set_user_role(UserRole::LegalOfficer);
    state.set_active_tab(TabId::Settings);
    assert_eq!(state.active_tab(), TabId::Settings);
    let events = state.subscribe();

    state.set_active_tab(TabId::InspectionPlanning);

    assert_eq!(state.active_tab(), TabId::LegalModule);
    let received: Vec<StateEvent> = events.try_iter().collect();
    assert_eq!(received, vec![StateEvent::TabChanged(TabId::LegalModule)]);
}

#[test]
fn subscribers_see_every_change_in_order() {
    let mut state = AppState::new();
    let events = state.subscribe();

    state.set_user_role(UserRole::LegalOfficer);
    let id = state.add_seizure(seizure_details("B-9"));
    state
        .update_seizure_status(&id, SeizureStatus::FirFiled)
        .unwrap();

    let received: Vec<StateEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            StateEvent::RoleChanged(UserRole::LegalOfficer),
            StateEvent::TabChanged(TabId::LegalModule),
            StateEvent::RecordAdded {
                kind: RecordKind::Seizure,
                id: id.clone(),
            },
            StateEvent::StatusChanged {
                kind: RecordKind::Seizure,
                id,
                from: "pending",
                to: "fir-filed",
            },
        ]
    );
    assert_eq!(state.revision(), 4);
}

#[test]
fn record_mutations_are_audited_with_the_acting_role() {
    let mut state = AppState::new();
    state.set_user_role(UserRole::FieldOfficer);
    let id = state.add_seizure(seizure_details("B-1"));

    let latest = state.audit_log().newest_first().next().unwrap();
    assert_eq!(latest.role, UserRole::FieldOfficer);
    assert_eq!(latest.action, format!("Seizure {id} logged"));
    assert_eq!(latest.details, "Location: Sangli Market");
}
