//! CLI argument definitions for the Agri Shield portal.

use std::path::PathBuf;

use agri_model::{
    Equipment, FirStatus, FormType, InspectionStatus, LabSampleStatus, SeizureStatus,
    SubmissionStatus, TabId, TargetType, UserRole,
};
use agri_state::ReportKind;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "agri-shield",
    version,
    about = "Agri Shield - agri-input quality enforcement and forms portal",
    long_about = "Plan inspections, scan and seize suspect agri-inputs, track lab samples \
                  and FIR cases, file regulatory forms and ask the AI assistant for crop \
                  health reports and planting schedules.\n\n\
                  Every command works against a session file that is loaded at start \
                  and saved after any change."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Session file (default: platform data directory).
    #[arg(long, value_name = "PATH", global = true)]
    pub session: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the active role, tab and the tabs the role may open.
    Status,

    /// Switch the simulated user role.
    Role {
        #[arg(value_name = "ROLE")]
        role: UserRole,
    },

    /// Open a navigation tab.
    Tab {
        #[arg(value_name = "TAB")]
        tab: TabId,
    },

    /// Headline enforcement figures and the weekly visit calendar.
    Dashboard,

    /// Plan and track inspection visits.
    #[command(subcommand)]
    Inspection(InspectionCommand),

    /// Scan a product for authenticity, optionally seizing it.
    Scan(ScanArgs),

    /// Logged seizures.
    #[command(subcommand)]
    Seizure(SeizureCommand),

    /// Samples under laboratory analysis.
    #[command(subcommand)]
    Lab(LabCommand),

    /// FIR cases.
    #[command(subcommand)]
    Fir(FirCommand),

    /// Daily, weekly or monthly activity report.
    Report {
        #[arg(value_name = "KIND", default_value = "daily")]
        kind: ReportKind,
    },

    /// Audit trail, newest first.
    Audit {
        /// Number of entries to show.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Fill in and file regulatory forms.
    #[command(subcommand)]
    Forms(FormsCommand),

    /// Review filed forms.
    #[command(subcommand)]
    Submissions(SubmissionsCommand),

    /// AI crop health reports and planting schedules.
    #[command(subcommand)]
    Ai(AiCommand),

    /// Inspect or create the settings file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

// ===== ENFORCEMENT =====

#[derive(Subcommand)]
pub enum InspectionCommand {
    /// List planned inspections.
    List,
    /// Schedule an inspection visit.
    Add(InspectionArgs),
    /// Move an inspection to a later status.
    Status {
        id: String,
        status: InspectionStatus,
    },
}

#[derive(Args)]
pub struct InspectionArgs {
    /// Assigned officer.
    #[arg(long)]
    pub officer: String,
    /// Visit time, e.g. `2024-06-03 10:30`.
    #[arg(long = "at", value_parser = parse_datetime)]
    pub scheduled_at: NaiveDateTime,
    #[arg(long)]
    pub location: String,
    #[arg(long = "target", default_value = "retailer")]
    pub target_type: TargetType,
    /// Equipment to carry (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub equipment: Vec<Equipment>,
}

#[derive(Args)]
pub struct ScanArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub product: String,
    #[arg(long = "batch")]
    pub batch_number: String,
    /// Scan location (default from settings).
    #[arg(long = "geo")]
    pub geo_location: Option<String>,
    /// Run the seizure protocol when the product reads as suspect.
    #[arg(long)]
    pub seize: bool,
    #[command(flatten)]
    pub protocol: ProtocolArgs,
}

#[derive(Args)]
pub struct ProtocolArgs {
    /// Units seized.
    #[arg(long, default_value_t = 50)]
    pub units: u32,
    #[arg(long, default_value = "Shop Owner")]
    pub witness: String,
    /// Sample type (default from the product category).
    #[arg(long = "sample-type")]
    pub sample_type: Option<String>,
    /// Laboratory receiving the sample.
    #[arg(long = "lab", default_value = "SPTL Ghaziabad")]
    pub lab_destination: String,
    /// Evidence photo reference (repeatable).
    #[arg(long = "photo")]
    pub photos: Vec<String>,
    /// Video evidence reference.
    #[arg(long)]
    pub video: Option<String>,
}

#[derive(Subcommand)]
pub enum SeizureCommand {
    List,
    /// Log a seizure by hand.
    Add(SeizureArgs),
    /// Move a seizure to a later status.
    Status { id: String, status: SeizureStatus },
    /// Mark a pending seizure as dispatched to the lab.
    Dispatch { id: String },
    /// Draft an FIR against the seizure.
    LegalAction { id: String },
}

#[derive(Args)]
pub struct SeizureArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub product: String,
    #[arg(long = "batch")]
    pub batch_number: String,
    /// Authenticity score in percent.
    #[arg(long)]
    pub score: u32,
    /// Observed issue (repeatable).
    #[arg(long = "issue")]
    pub issues: Vec<String>,
    #[arg(long, default_value = "Suspected Counterfeit")]
    pub recommendation: String,
    #[arg(long = "geo")]
    pub geo_location: Option<String>,
    #[arg(long)]
    pub quantity: Option<String>,
    #[arg(long = "value")]
    pub estimated_value: Option<String>,
    #[arg(long = "witness")]
    pub witness_name: Option<String>,
}

#[derive(Subcommand)]
pub enum LabCommand {
    List,
    /// Prepare a sample from an existing seizure.
    Add {
        /// Seizure the sample is drawn from.
        #[arg(long)]
        seizure: String,
        #[arg(long = "sample-type", default_value = "Pesticide")]
        sample_type: String,
        #[arg(long = "lab", default_value = "SPTL Ghaziabad")]
        lab_destination: String,
    },
    /// Move a sample to a later status.
    Status { id: String, status: LabSampleStatus },
    /// Record the analysis outcome.
    Result {
        id: String,
        result: LabResultArg,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LabResultArg {
    Violation,
    Compliant,
}

impl From<LabResultArg> for LabSampleStatus {
    fn from(arg: LabResultArg) -> Self {
        match arg {
            LabResultArg::Violation => Self::Violation,
            LabResultArg::Compliant => Self::Compliant,
        }
    }
}

#[derive(Subcommand)]
pub enum FirCommand {
    List,
    /// Draft an FIR by hand.
    Add(FirArgs),
    /// Move an FIR to a later status.
    Status { id: String, status: FirStatus },
    /// Submit a drafted FIR.
    Submit { id: String },
}

#[derive(Args)]
pub struct FirArgs {
    #[arg(long)]
    pub seizure: Option<String>,
    #[arg(long = "lab-report")]
    pub lab_report_id: String,
    #[arg(long = "violation")]
    pub violation_type: String,
    #[arg(long)]
    pub accused: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub details: Option<String>,
}

// ===== FORMS PORTAL =====

#[derive(Subcommand)]
pub enum FormsCommand {
    /// List available forms.
    Catalog,
    /// Start a new draft of a form.
    Open { form: FormType },
    /// Reopen a submission that was returned for update or rejected.
    Update { id: String },
    /// Show the current draft.
    Show {
        /// Only fields flagged for update.
        #[arg(long)]
        flagged: bool,
    },
    /// Set a field on the current draft.
    Set { field: String, value: String },
    /// Clear a field on the current draft.
    Clear { field: String },
    /// Move between steps: `next`, `prev` or a step number.
    Step {
        #[arg(value_parser = parse_step)]
        step: StepArg,
    },
    /// File the current draft.
    Submit,
    /// Throw the current draft away.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepArg {
    Next,
    Previous,
    To(usize),
}

#[derive(Subcommand)]
pub enum SubmissionsCommand {
    /// List submissions, optionally filtered.
    List {
        #[arg(long)]
        status: Option<SubmissionStatus>,
        /// Form name substring.
        #[arg(long = "form-type")]
        form_type: Option<String>,
        /// Search over id and form name.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one submission with its values.
    Show { id: String },
    /// Move every pending submission under review.
    Process,
    /// Return a submission to the applicant for corrections.
    Return {
        id: String,
        /// Field that needs correcting (repeatable).
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    Approve { id: String },
    Reject {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}

// ===== AI =====

#[derive(Subcommand)]
pub enum AiCommand {
    /// Generate a crop health report for a region.
    CropReport(CropReportArgs),
    /// Create an optimized planting schedule.
    Planting(PlantingArgs),
}

#[derive(Args)]
pub struct CropReportArgs {
    #[arg(long)]
    pub region: String,
    #[arg(long = "crop")]
    pub crop_type: String,
    #[arg(long = "weather")]
    pub weather_data: String,
    /// Satellite image file, or a `data:` URI.
    #[arg(long = "image", value_name = "PATH_OR_URI")]
    pub satellite_imagery: String,
    #[arg(long = "history")]
    pub historical_data: String,
    /// Print the rendered prompt instead of calling the model.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PlantingArgs {
    #[arg(long = "crop")]
    pub crop_type: String,
    #[arg(long)]
    pub location: String,
    #[arg(long = "weather")]
    pub weather_data: Option<String>,
    #[arg(long = "preferences")]
    pub farmer_preferences: Option<String>,
    /// Print the rendered prompt instead of calling the model.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings as TOML.
    Show,
    /// Print the settings and session file locations.
    Path,
    /// Write the default settings file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ===== LOGGING =====

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

// ===== VALUE PARSERS =====

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD HH:MM, got {raw:?}"))
}

pub fn parse_step(raw: &str) -> Result<StepArg, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "next" => Ok(StepArg::Next),
        "prev" | "previous" | "back" => Ok(StepArg::Previous),
        other => other
            .parse()
            .map(StepArg::To)
            .map_err(|_| format!("expected next, prev or a step number, got {raw:?}")),
    }
}
