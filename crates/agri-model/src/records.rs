//! Enforcement records: inspection tasks, seizures, lab samples, FIR cases.
//!
//! Each record has a `New*` draft carrying the caller-supplied fields. The
//! store assigns the identifier and initial status when it accepts a draft.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordId;
use crate::status::{FirStatus, InspectionStatus, LabSampleStatus, SeizureStatus};

/// Scores at or above this read as authentic.
pub const AUTHENTIC_THRESHOLD: u8 = 50;

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ModelError::MissingField { field })
    } else {
        Ok(())
    }
}

// =============================================================================
// INSPECTION TASKS
// =============================================================================

/// Kind of premises an inspection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetType {
    Retailer,
    Distributor,
    Warehouse,
    MarketSurvey,
}

impl TargetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retailer => "retailer",
            Self::Distributor => "distributor",
            Self::Warehouse => "warehouse",
            Self::MarketSurvey => "market-survey",
        }
    }

    pub const fn all() -> &'static [TargetType] {
        &[
            Self::Retailer,
            Self::Distributor,
            Self::Warehouse,
            Self::MarketSurvey,
        ]
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::unknown("target type", s))
    }
}

/// Field equipment that can be assigned to an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Equipment {
    Truscan,
    Gemini,
    Bodycam,
    Gps,
}

impl Equipment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Truscan => "truscan",
            Self::Gemini => "gemini",
            Self::Bodycam => "bodycam",
            Self::Gps => "gps",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Truscan => "TruScan Device",
            Self::Gemini => "Gemini Analyzer",
            Self::Bodycam => "Axon Body Cam",
            Self::Gps => "GPS Tracker",
        }
    }

    pub const fn all() -> &'static [Equipment] {
        &[Self::Truscan, Self::Gemini, Self::Bodycam, Self::Gps]
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Equipment {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::unknown("equipment", s))
    }
}

/// Draft of an inspection visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInspectionTask {
    pub officer: String,
    pub scheduled_at: NaiveDateTime,
    pub location: String,
    pub target_type: TargetType,
    pub equipment: Vec<Equipment>,
}

impl NewInspectionTask {
    /// Required-field check the planning form applies before submitting.
    pub fn validate(&self) -> Result<()> {
        require("officer", &self.officer)?;
        require("location", &self.location)
    }
}

/// Planned inspection visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionTask {
    pub id: RecordId,
    pub officer: String,
    pub scheduled_at: NaiveDateTime,
    pub location: String,
    pub target_type: TargetType,
    pub equipment: Vec<Equipment>,
    pub status: InspectionStatus,
}

impl InspectionTask {
    pub fn from_draft(id: RecordId, draft: NewInspectionTask, status: InspectionStatus) -> Self {
        Self {
            id,
            officer: draft.officer,
            scheduled_at: draft.scheduled_at,
            location: draft.location,
            target_type: draft.target_type,
            equipment: draft.equipment,
            status,
        }
    }
}

// =============================================================================
// SEIZURES
// =============================================================================

/// Authenticity reading in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AuthenticityScore(u8);

impl AuthenticityScore {
    pub fn new(value: u32) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Self)
            .ok_or(ModelError::ScoreOutOfRange(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Below the authenticity threshold; eligible for seizure.
    pub fn is_suspect(&self) -> bool {
        self.0 < AUTHENTIC_THRESHOLD
    }
}

impl TryFrom<u32> for AuthenticityScore {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AuthenticityScore> for u32 {
    fn from(score: AuthenticityScore) -> Self {
        u32::from(score.0)
    }
}

impl fmt::Display for AuthenticityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// What was seized, where, and with what evidence.
///
/// Shared by seizures and the lab samples drawn from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeizureDetails {
    pub company: String,
    pub product: String,
    pub batch_number: String,
    pub authenticity_score: AuthenticityScore,
    #[serde(default)]
    pub issues: Vec<String>,
    pub recommendation: String,
    pub geo_location: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence_photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_evidence: Option<String>,
}

impl SeizureDetails {
    pub fn validate(&self) -> Result<()> {
        require("company", &self.company)?;
        require("product", &self.product)?;
        require("batch_number", &self.batch_number)
    }

    /// Numeric part of `estimated_value` (`"₹2,600"` reads as 2600).
    pub fn estimated_amount(&self) -> Option<f64> {
        let raw = self.estimated_value.as_deref()?;
        let digits: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        digits.parse().ok()
    }
}

/// Logged confiscation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seizure {
    pub id: RecordId,
    #[serde(flatten)]
    pub details: SeizureDetails,
    pub status: SeizureStatus,
}

// =============================================================================
// LAB SAMPLES
// =============================================================================

/// Draft of a sample forwarded for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLabSample {
    /// Seizure the sample was drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seizure_id: Option<RecordId>,
    #[serde(flatten)]
    pub details: SeizureDetails,
    pub sample_type: String,
    pub lab_destination: String,
}

/// Sample under laboratory analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabSample {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seizure_id: Option<RecordId>,
    #[serde(flatten)]
    pub details: SeizureDetails,
    pub sample_type: String,
    pub lab_destination: String,
    pub status: LabSampleStatus,
}

impl LabSample {
    pub fn from_draft(id: RecordId, draft: NewLabSample, status: LabSampleStatus) -> Self {
        Self {
            id,
            seizure_id: draft.seizure_id,
            details: draft.details,
            sample_type: draft.sample_type,
            lab_destination: draft.lab_destination,
            status,
        }
    }
}

// =============================================================================
// FIR CASES
// =============================================================================

/// Draft of a First Information Report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFirCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seizure_id: Option<RecordId>,
    pub lab_report_id: String,
    pub violation_type: String,
    pub accused: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl NewFirCase {
    /// Required-field check applied to manually drafted FIRs.
    pub fn validate(&self) -> Result<()> {
        require("lab_report_id", &self.lab_report_id)?;
        require("violation_type", &self.violation_type)?;
        require("accused", &self.accused)?;
        require("location", &self.location)
    }
}

/// Legal case record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirCase {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seizure_id: Option<RecordId>,
    pub lab_report_id: String,
    pub violation_type: String,
    pub accused: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: FirStatus,
}

impl FirCase {
    pub fn from_draft(id: RecordId, draft: NewFirCase, status: FirStatus) -> Self {
        Self {
            id,
            seizure_id: draft.seizure_id,
            lab_report_id: draft.lab_report_id,
            violation_type: draft.violation_type,
            accused: draft.accused,
            location: draft.location,
            details: draft.details,
            status,
        }
    }
}
