//! Commands run end to end against an in-memory session.

use agri_ai::{AiError, GenerationRequest, TextGenerator};
use agri_cli::cli::Cli;
use agri_cli::commands::{Services, run};
use agri_cli::settings::Settings;
use agri_model::{
    Equipment, InspectionStatus, LabSampleStatus, SeizureStatus, SubmissionStatus, TabId, UserRole,
};
use agri_state::{AppState, AuthenticityProbe, ProbeReading, ScanRequest};
use clap::Parser;

struct FixedProbe(ProbeReading);

impl AuthenticityProbe for FixedProbe {
    fn read(&self, _request: &ScanRequest) -> ProbeReading {
        self.0
    }
}

struct CannedGenerator(Result<&'static str, u16>);

impl TextGenerator for CannedGenerator {
    fn generate(&self, _request: &GenerationRequest) -> agri_ai::Result<String> {
        match self.0 {
            Ok(text) => Ok(text.to_string()),
            Err(status) => Err(AiError::Api {
                status,
                message: "quota exceeded".to_string(),
            }),
        }
    }
}

fn services(counterfeit: bool) -> Services {
    let mut services = Services::from_settings(&Settings::default());
    services.probe = Box::new(FixedProbe(ProbeReading {
        counterfeit,
        score: if counterfeit { 32 } else { 91 },
    }));
    services
}

fn exec(state: &mut AppState, services: &Services, args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("agri-shield").chain(args.iter().copied()))?;
    run(cli.command, state, services)
}

#[test]
fn suspect_scan_with_seize_logs_seizure_and_sample() {
    let mut state = AppState::new();
    let services = services(true);
    exec(
        &mut state,
        &services,
        &[
            "scan", "--company", "UPL", "--product", "Saaf", "--batch", "UPL-SAAF-202405-00001",
            "--seize", "--units", "20",
        ],
    )
    .unwrap();

    assert_eq!(state.seizures().len(), 1);
    let seizure = &state.seizures()[0];
    assert_eq!(seizure.status, SeizureStatus::Pending);
    assert_eq!(seizure.details.quantity.as_deref(), Some("20 units"));
    assert_eq!(state.lab_samples().len(), 1);
    assert_eq!(state.lab_samples()[0].seizure_id.as_ref(), Some(&seizure.id));
}

#[test]
fn authentic_scan_changes_nothing() {
    let mut state = AppState::new();
    let revision = state.revision();
    exec(
        &mut state,
        &services(false),
        &["scan", "--company", "UPL", "--product", "Saaf", "--batch", "B-1", "--seize"],
    )
    .unwrap();
    assert!(state.seizures().is_empty());
    assert_eq!(state.revision(), revision);
}

#[test]
fn inspection_equipment_is_deduplicated() {
    let mut state = AppState::new();
    exec(
        &mut state,
        &services(false),
        &[
            "inspection", "add", "--officer", "R. Patil", "--at", "2024-06-03 10:30",
            "--location", "Kolhapur APMC", "--target", "market-survey", "--equipment",
            "gps,truscan,gps",
        ],
    )
    .unwrap();
    let task = &state.inspection_tasks()[0];
    assert_eq!(task.equipment, vec![Equipment::Truscan, Equipment::Gps]);
    assert_eq!(task.status, InspectionStatus::Scheduled);
}

#[test]
fn unknown_id_is_reported_not_raised() {
    let mut state = AppState::new();
    let revision = state.revision();
    exec(
        &mut state,
        &services(false),
        &["seizure", "status", "SEZ-404", "dispatched"],
    )
    .unwrap();
    assert_eq!(state.revision(), revision);
}

#[test]
fn backward_transition_fails() {
    let mut state = AppState::new();
    let services = services(true);
    exec(
        &mut state,
        &services,
        &["scan", "--company", "Acme", "--product", "X", "--batch", "1", "--seize"],
    )
    .unwrap();
    let id = state.seizures()[0].id.to_string();
    exec(&mut state, &services, &["seizure", "dispatch", &id]).unwrap();

    let err = exec(&mut state, &services, &["seizure", "status", &id, "pending"]).unwrap_err();
    assert!(err.to_string().contains("illegal seizure status transition"));
    assert_eq!(state.seizures()[0].status, SeizureStatus::Dispatched);
}

#[test]
fn lab_violation_drafts_fir() {
    let mut state = AppState::new();
    let services = services(true);
    exec(
        &mut state,
        &services,
        &["scan", "--company", "UPL", "--product", "Saaf", "--batch", "9", "--seize"],
    )
    .unwrap();
    let sample = state.lab_samples()[0].id.to_string();
    exec(
        &mut state,
        &services,
        &["lab", "result", &sample, "violation", "--notes", "Carbendazim 2%"],
    )
    .unwrap();

    assert_eq!(state.lab_samples()[0].status, LabSampleStatus::Violation);
    assert_eq!(state.fir_cases().len(), 1);
    assert_eq!(state.seizures()[0].status, SeizureStatus::ReportGenerated);
}

#[test]
fn role_switch_falls_back_to_an_allowed_tab() {
    let mut state = AppState::new();
    let services = services(false);
    exec(&mut state, &services, &["tab", "system-audit"]).unwrap();
    exec(&mut state, &services, &["role", "farmer"]).unwrap();
    assert_eq!(state.user_role(), UserRole::Farmer);
    assert!(state.allowed_tabs().iter().any(|tab| tab.id == state.active_tab()));
    assert_ne!(state.active_tab(), TabId::SystemAudit);
}

#[test]
fn forbidden_tab_leaves_the_session_untouched() {
    let mut state = AppState::new();
    let services = services(false);
    exec(&mut state, &services, &["role", "legal-officer"]).unwrap();
    let revision = state.revision();

    exec(&mut state, &services, &["tab", "inspection-planning"]).unwrap();

    assert_eq!(state.active_tab(), TabId::LegalModule);
    assert_eq!(state.revision(), revision);
}

#[test]
fn form_is_filed_reviewed_and_returned() {
    let mut state = AppState::new();
    let services = services(false);
    exec(&mut state, &services, &["forms", "open", "formA1"]).unwrap();
    assert_eq!(state.active_tab(), TabId::FormRenderer);
    exec(&mut state, &services, &["forms", "set", "fullName", "Sunita Jadhav"]).unwrap();
    exec(&mut state, &services, &["forms", "set", "declaration", "yes"]).unwrap();
    assert!(exec(&mut state, &services, &["forms", "set", "premisesSize", "large"]).is_err());
    exec(&mut state, &services, &["forms", "step", "next"]).unwrap();
    assert_eq!(state.form_draft().map(|d| d.step()), Some(2));
    exec(&mut state, &services, &["forms", "submit"]).unwrap();

    assert!(state.form_draft().is_none());
    let id = state.submissions()[0].id.to_string();
    exec(&mut state, &services, &["submissions", "process"]).unwrap();
    assert_eq!(state.submissions()[0].status, SubmissionStatus::UnderReview);

    exec(
        &mut state,
        &services,
        &["submissions", "return", &id, "--field", "panNumber", "--comment", "PAN missing"],
    )
    .unwrap();
    assert_eq!(state.submissions()[0].status, SubmissionStatus::PendingUpdate);

    exec(&mut state, &services, &["forms", "update", &id]).unwrap();
    assert!(exec(&mut state, &services, &["forms", "submit"]).is_err());
    exec(&mut state, &services, &["forms", "set", "panNumber", "ABCDE1234F"]).unwrap();
    exec(&mut state, &services, &["forms", "submit"]).unwrap();
    assert_eq!(state.submissions()[0].status, SubmissionStatus::Pending);
}

#[test]
fn planting_schedule_uses_the_generator() {
    let mut state = AppState::new();
    let services = services(false).with_generator(Box::new(CannedGenerator(Ok(
        r#"{"plantingSchedule": "Sow 15-30 June", "rationale": "Monsoon onset"}"#,
    ))));
    exec(
        &mut state,
        &services,
        &["ai", "planting", "--crop", "Soybean", "--location", "Latur"],
    )
    .unwrap();
}

#[test]
fn ai_failure_surfaces_and_leaves_state_alone() {
    let mut state = AppState::new();
    let revision = state.revision();
    let services = services(false).with_generator(Box::new(CannedGenerator(Err(429))));
    let err = exec(
        &mut state,
        &services,
        &["ai", "planting", "--crop", "Soybean", "--location", "Latur"],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "The AI service rejected the request.");
    assert!(format!("{err:#}").contains("quota exceeded"));
    assert_eq!(state.revision(), revision);
}
