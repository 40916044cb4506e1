//! Command execution against a loaded session.

use agri_ai::{GeminiClient, GeminiConfig, TextGenerator};
use agri_model::{
    AuthenticityScore, NewFirCase, NewInspectionTask, NewLabSample, RecordId, SeizureDetails,
};
use agri_state::{
    AppState, AuthenticityProbe, DEFAULT_GEO_LOCATION, ScanRequest, SeizureProtocol,
    SimulatedProbe, UpdateOutcome, scan_product,
};
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{
    Command, FirArgs, FirCommand, InspectionArgs, InspectionCommand, LabCommand, ProtocolArgs,
    ScanArgs, SeizureArgs, SeizureCommand,
};
use crate::settings::Settings;
use crate::summary::{
    print_audit, print_dashboard, print_fir_cases, print_inspections, print_lab_samples,
    print_report, print_scan, print_seizures, print_status,
};
use crate::{ai, portal};

/// Collaborators commands need besides the state.
pub struct Services {
    pub probe: Box<dyn AuthenticityProbe>,
    pub ai: GeminiConfig,
    /// Location stamped on scans and manual seizures.
    pub geo_location: String,
    generator: Option<Box<dyn TextGenerator>>,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            probe: Box::new(SimulatedProbe),
            ai: settings.ai.clone(),
            geo_location: settings
                .session
                .geo_location
                .clone()
                .unwrap_or_else(|| DEFAULT_GEO_LOCATION.to_string()),
            generator: None,
        }
    }

    /// Use `generator` instead of the hosted model.
    #[must_use]
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Run `f` with the configured generator, building the HTTP client on demand.
    pub fn with_text_generator<T>(
        &self,
        f: impl FnOnce(&dyn TextGenerator) -> agri_ai::Result<T>,
    ) -> agri_ai::Result<T> {
        if let Some(generator) = &self.generator {
            return f(generator.as_ref());
        }
        let client = GeminiClient::from_env(self.ai.clone())?;
        f(&client)
    }
}

/// Execute `command`. Mutations are applied to `state`; the caller saves.
pub fn run(command: Command, state: &mut AppState, services: &Services) -> Result<()> {
    match command {
        Command::Status => print_status(state),
        Command::Role { role } => {
            state.set_user_role(role);
            println!("Now acting as {}.", role.label());
            println!("Active tab: {}", state.active_tab().definition().text);
        }
        Command::Tab { tab } => {
            state.set_active_tab(tab);
            if state.active_tab() != tab {
                warn!(
                    "{} is not available to {}",
                    tab.definition().text,
                    state.user_role().label()
                );
            }
            println!("Active tab: {}", state.active_tab().definition().text);
        }
        Command::Dashboard => print_dashboard(&state.dashboard_stats(), &state.weekly_schedule()),
        Command::Inspection(cmd) => run_inspection(cmd, state)?,
        Command::Scan(args) => run_scan(&args, state, services)?,
        Command::Seizure(cmd) => run_seizure(cmd, state, services)?,
        Command::Lab(cmd) => run_lab(cmd, state)?,
        Command::Fir(cmd) => run_fir(cmd, state)?,
        Command::Report { kind } => print_report(&state.activity_report(kind, Utc::now())),
        Command::Audit { limit } => print_audit(state.audit_log().recent(limit)),
        Command::Forms(cmd) => portal::run_forms(cmd, state)?,
        Command::Submissions(cmd) => portal::run_submissions(cmd, state)?,
        Command::Ai(cmd) => ai::run_ai(cmd, services)?,
        Command::Config(_) => anyhow::bail!("config commands run without a session"),
    }
    Ok(())
}

/// Print the result of a status update; a missing record is not an error.
pub(crate) fn report_update(kind: &str, id: &RecordId, outcome: UpdateOutcome, done: &str) {
    match outcome {
        UpdateOutcome::Applied => println!("{kind} {id} {done}."),
        UpdateOutcome::NotFound => {
            warn!("No {kind} with id {id}; nothing changed");
            println!("No {kind} with id {id}.");
        }
    }
}

// ===== INSPECTIONS =====

fn run_inspection(cmd: InspectionCommand, state: &mut AppState) -> Result<()> {
    match cmd {
        InspectionCommand::List => print_inspections(state.inspection_tasks()),
        InspectionCommand::Add(args) => {
            let draft = inspection_draft(args);
            draft.validate().context("invalid inspection")?;
            let id = state.add_inspection_task(draft);
            println!("Inspection {id} scheduled.");
        }
        InspectionCommand::Status { id, status } => {
            let id = RecordId::from(id);
            let outcome = state.update_inspection_task_status(&id, status)?;
            report_update("inspection", &id, outcome, &format!("is now {status}"));
        }
    }
    Ok(())
}

fn inspection_draft(args: InspectionArgs) -> NewInspectionTask {
    let mut equipment = args.equipment;
    equipment.sort();
    equipment.dedup();
    NewInspectionTask {
        officer: args.officer,
        scheduled_at: args.scheduled_at,
        location: args.location,
        target_type: args.target_type,
        equipment,
    }
}

// ===== FIELD EXECUTION =====

fn protocol(args: &ProtocolArgs) -> SeizureProtocol {
    SeizureProtocol {
        units: args.units,
        witness_name: args.witness.clone(),
        sample_type: args.sample_type.clone(),
        lab_destination: args.lab_destination.clone(),
        evidence_photos: args.photos.clone(),
        video_evidence: args.video.clone(),
    }
}

fn run_scan(args: &ScanArgs, state: &mut AppState, services: &Services) -> Result<()> {
    let request = ScanRequest {
        company: args.company.clone(),
        product: args.product.clone(),
        batch_number: args.batch_number.clone(),
        geo_location: Some(
            args.geo_location
                .clone()
                .unwrap_or_else(|| services.geo_location.clone()),
        ),
    };
    let scan = scan_product(services.probe.as_ref(), &request).context("scan failed")?;
    print_scan(&scan);

    if !scan.is_seizable() {
        if args.seize {
            println!("Product reads as authentic; no seizure needed.");
        }
        return Ok(());
    }
    if !args.seize {
        println!("Suspect product. Run again with --seize to start the seizure protocol.");
        return Ok(());
    }

    let records = state.log_seizure_from_scan(&scan, &protocol(&args.protocol))?;
    println!("Seizure {} logged.", records.seizure_id);
    println!("Lab sample {} prepared.", records.lab_sample_id);
    Ok(())
}

// ===== SEIZURES =====

fn run_seizure(cmd: SeizureCommand, state: &mut AppState, services: &Services) -> Result<()> {
    match cmd {
        SeizureCommand::List => print_seizures(state.seizures()),
        SeizureCommand::Add(args) => {
            let details = seizure_details(args, &services.geo_location)?;
            let id = state.add_seizure(details);
            println!("Seizure {id} logged.");
        }
        SeizureCommand::Status { id, status } => {
            let id = RecordId::from(id);
            let outcome = state.update_seizure_status(&id, status)?;
            report_update("seizure", &id, outcome, &format!("is now {status}"));
        }
        SeizureCommand::Dispatch { id } => {
            let id = RecordId::from(id);
            state.dispatch_seizure_to_lab(&id)?;
            println!("Seizure {id} dispatched to lab.");
        }
        SeizureCommand::LegalAction { id } => {
            let id = RecordId::from(id);
            let fir = state.initiate_legal_action(&id)?;
            println!("FIR {fir} drafted against seizure {id}.");
        }
    }
    Ok(())
}

fn seizure_details(args: SeizureArgs, default_geo: &str) -> Result<SeizureDetails> {
    let details = SeizureDetails {
        company: args.company,
        product: args.product,
        batch_number: args.batch_number,
        authenticity_score: AuthenticityScore::new(args.score)?,
        issues: args.issues,
        recommendation: args.recommendation,
        geo_location: args
            .geo_location
            .unwrap_or_else(|| default_geo.to_string()),
        timestamp: Utc::now(),
        quantity: args.quantity,
        estimated_value: args.estimated_value,
        witness_name: args.witness_name,
        evidence_photos: Vec::new(),
        video_evidence: None,
    };
    details.validate().context("invalid seizure")?;
    Ok(details)
}

// ===== LAB =====

fn run_lab(cmd: LabCommand, state: &mut AppState) -> Result<()> {
    match cmd {
        LabCommand::List => print_lab_samples(state.lab_samples()),
        LabCommand::Add {
            seizure,
            sample_type,
            lab_destination,
        } => {
            let seizure_id = RecordId::from(seizure);
            let seizure = state
                .find_seizure(&seizure_id)
                .with_context(|| format!("no seizure with id {seizure_id}"))?;
            let draft = NewLabSample {
                seizure_id: Some(seizure_id.clone()),
                details: seizure.details.clone(),
                sample_type,
                lab_destination,
            };
            let id = state.add_lab_sample(draft);
            println!("Lab sample {id} prepared from seizure {seizure_id}.");
        }
        LabCommand::Status { id, status } => {
            let id = RecordId::from(id);
            let outcome = state.update_lab_sample_status(&id, status)?;
            report_update("lab sample", &id, outcome, &format!("is now {status}"));
        }
        LabCommand::Result { id, result, notes } => {
            let id = RecordId::from(id);
            let outcome = state.record_lab_result(&id, result.into(), &notes)?;
            println!("Result recorded for sample {id}.");
            if let Some(fir) = outcome.fir_case {
                println!("FIR {fir} drafted from the violation.");
            }
            if outcome.seizure_updated {
                info!(sample = %id, "linked seizure moved to report-generated");
                println!("Linked seizure marked report-generated.");
            }
        }
    }
    Ok(())
}

// ===== FIR =====

fn run_fir(cmd: FirCommand, state: &mut AppState) -> Result<()> {
    match cmd {
        FirCommand::List => print_fir_cases(state.fir_cases()),
        FirCommand::Add(args) => {
            let draft = fir_draft(args);
            draft.validate().context("invalid FIR")?;
            let id = state.add_fir_case(draft);
            println!("FIR {id} drafted.");
        }
        FirCommand::Status { id, status } => {
            let id = RecordId::from(id);
            let outcome = state.update_fir_case_status(&id, status)?;
            report_update("FIR", &id, outcome, &format!("is now {status}"));
        }
        FirCommand::Submit { id } => {
            let id = RecordId::from(id);
            state.submit_fir(&id)?;
            println!("FIR {id} submitted to the e-FIR system.");
        }
    }
    Ok(())
}

fn fir_draft(args: FirArgs) -> NewFirCase {
    NewFirCase {
        seizure_id: args.seizure.map(RecordId::from),
        lab_report_id: args.lab_report_id,
        violation_type: args.violation_type,
        accused: args.accused,
        location: args.location,
        details: args.details,
    }
}
