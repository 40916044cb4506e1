//! End-to-end enforcement workflows.

use agri_model::{FirStatus, LabSampleStatus, RecordId, SeizureStatus};
use agri_state::{
    AppState, AuthenticityProbe, ProbeReading, ScanRequest, SeizureProtocol, StateError,
    scan_product,
};

struct Counterfeit;

impl AuthenticityProbe for Counterfeit {
    fn read(&self, _request: &ScanRequest) -> ProbeReading {
        ProbeReading {
            counterfeit: true,
            score: 28,
        }
    }
}

fn seize(state: &mut AppState, company: &str, product: &str) -> (RecordId, RecordId) {
    let scan = scan_product(
        &Counterfeit,
        &ScanRequest {
            company: company.to_string(),
            product: product.to_string(),
            batch_number: "BATCH-77".to_string(),
            geo_location: Some("Ichalkaranji".to_string()),
        },
    )
    .unwrap();
    let records = state
        .log_seizure_from_scan(&scan, &SeizureProtocol::default())
        .unwrap();
    (records.seizure_id, records.lab_sample_id)
}

#[test]
fn seizure_protocol_logs_linked_seizure_and_sample() {
    let mut state = AppState::new();
    let (seizure_id, sample_id) = seize(&mut state, "UPL", "Saaf");

    let seizure = state.find_seizure(&seizure_id).unwrap();
    assert_eq!(seizure.status, SeizureStatus::Pending);
    assert_eq!(seizure.details.quantity.as_deref(), Some("50 units"));
    assert_eq!(seizure.details.estimated_value.as_deref(), Some("₹6000"));
    assert_eq!(seizure.details.witness_name.as_deref(), Some("Shop Owner"));

    let sample = state.find_lab_sample(&sample_id).unwrap();
    assert_eq!(sample.status, LabSampleStatus::InTransit);
    assert_eq!(sample.seizure_id.as_ref(), Some(&seizure_id));
    assert_eq!(sample.sample_type, "Pesticide");
    assert_eq!(sample.lab_destination, "SPTL Ghaziabad");
}

#[test]
fn fertilizer_samples_take_their_category_type() {
    let mut state = AppState::new();
    let (seizure_id, sample_id) = seize(&mut state, "IFFCO", "DAP");
    assert_eq!(
        state.find_lab_sample(&sample_id).unwrap().sample_type,
        "Fertilizer"
    );
    assert_eq!(
        state
            .find_seizure(&seizure_id)
            .unwrap()
            .details
            .estimated_value
            .as_deref(),
        Some("₹67500")
    );
}

#[test]
fn violation_result_drafts_fir_and_updates_seizure() {
    let mut state = AppState::new();
    let (seizure_id, sample_id) = seize(&mut state, "UPL", "Saaf");
    state.dispatch_seizure_to_lab(&seizure_id).unwrap();

    let outcome = state
        .record_lab_result(&sample_id, LabSampleStatus::Violation, "Carbendazim 2%")
        .unwrap();

    assert!(outcome.seizure_updated);
    assert_eq!(
        state.find_seizure(&seizure_id).unwrap().status,
        SeizureStatus::ReportGenerated
    );
    let fir = state.find_fir_case(&outcome.fir_case.unwrap()).unwrap();
    assert_eq!(fir.status, FirStatus::Draft);
    assert_eq!(fir.seizure_id.as_ref(), Some(&seizure_id));
    assert_eq!(fir.lab_report_id, sample_id.as_str());
    assert!(fir.violation_type.starts_with("Lab Confirmed Violation: Poor print quality"));
    assert_eq!(
        fir.details.as_deref(),
        Some("Lab result: Violation. Notes: Carbendazim 2%")
    );
    assert_eq!(fir.accused, "Unknown Dealer/Retailer");
}

#[test]
fn compliant_result_does_not_draft_fir() {
    let mut state = AppState::new();
    let (seizure_id, sample_id) = seize(&mut state, "Bayer", "Confidor");
    let outcome = state
        .record_lab_result(&sample_id, LabSampleStatus::Compliant, "")
        .unwrap();

    assert!(outcome.fir_case.is_none());
    assert!(state.fir_cases().is_empty());
    assert_eq!(
        state.find_seizure(&seizure_id).unwrap().status,
        SeizureStatus::ReportGenerated
    );
}

#[test]
fn lab_result_leaves_seizure_already_in_legal_process() {
    let mut state = AppState::new();
    let (seizure_id, sample_id) = seize(&mut state, "UPL", "Saaf");
    state.initiate_legal_action(&seizure_id).unwrap();

    let outcome = state
        .record_lab_result(&sample_id, LabSampleStatus::Violation, "")
        .unwrap();

    assert!(!outcome.seizure_updated);
    assert_eq!(
        state.find_seizure(&seizure_id).unwrap().status,
        SeizureStatus::FirFiled
    );
    assert_eq!(state.fir_cases().len(), 2);
}

#[test]
fn legal_action_drafts_fir_from_seizure() {
    let mut state = AppState::new();
    let (seizure_id, _) = seize(&mut state, "UPL", "Saaf");

    let fir_id = state.initiate_legal_action(&seizure_id).unwrap();
    let fir = state.find_fir_case(&fir_id).unwrap();
    assert_eq!(fir.lab_report_id, format!("REQ-{seizure_id}"));
    assert_eq!(
        fir.violation_type,
        "Poor print quality, Wrong shade of green, Missing hologram"
    );
    assert_eq!(fir.location, "Ichalkaranji");

    assert_eq!(
        state.initiate_legal_action(&seizure_id).unwrap_err(),
        StateError::LegalActionExists(seizure_id)
    );
    assert_eq!(state.fir_cases().len(), 1);
}

#[test]
fn dispatch_twice_is_rejected() {
    let mut state = AppState::new();
    let (seizure_id, _) = seize(&mut state, "UPL", "Ulala");
    state.dispatch_seizure_to_lab(&seizure_id).unwrap();
    assert!(state.dispatch_seizure_to_lab(&seizure_id).is_err());
    assert!(matches!(
        state.dispatch_seizure_to_lab(&RecordId::from("SEZ-404")),
        Err(StateError::SeizureNotFound(_))
    ));
}

#[test]
fn submit_fir_moves_draft_to_submitted() {
    let mut state = AppState::new();
    let (seizure_id, _) = seize(&mut state, "UPL", "Saaf");
    let fir_id = state.initiate_legal_action(&seizure_id).unwrap();

    state.submit_fir(&fir_id).unwrap();
    assert_eq!(
        state.find_fir_case(&fir_id).unwrap().status,
        FirStatus::Submitted
    );
    assert!(state.submit_fir(&fir_id).is_err());
}
