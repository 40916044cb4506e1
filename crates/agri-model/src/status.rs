//! Record status state machines.
//!
//! Each entity's status is a closed enum with a single transition function.
//! Statuses only move forward along their sequence; moving backwards, staying
//! put, or jumping between sibling terminal outcomes is rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Shared behaviour of every record status.
pub trait StatusMachine: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Status every new record starts in.
    fn initial() -> Self;

    /// All statuses in sequence order.
    fn all() -> &'static [Self];

    /// Stable identifier.
    fn as_str(&self) -> &'static str;

    /// Whether moving from `self` to `next` is a legal step.
    fn can_transition_to(&self, next: Self) -> bool;

    /// Whether no further transition is possible.
    fn is_terminal(&self) -> bool {
        Self::all().iter().all(|next| !self.can_transition_to(*next))
    }

    /// Validate a transition, returning the new status.
    fn transition(self, next: Self) -> Result<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ModelError::IllegalTransition {
                entity: Self::ENTITY,
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }

    /// Parse an identifier such as `lab-received`.
    fn parse_status(value: &str) -> Result<Self> {
        let needle = value.trim();
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ModelError::unknown(Self::ENTITY, value))
    }
}

macro_rules! status_display {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(StatusMachine::as_str(self))
            }
        }

        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self> {
                <$ty as StatusMachine>::parse_status(s)
            }
        }
    };
}

// =============================================================================
// INSPECTION
// =============================================================================

/// Inspection task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Scheduled => 0,
            Self::InProgress => 1,
            Self::Completed | Self::Cancelled => 2,
        }
    }
}

impl StatusMachine for InspectionStatus {
    const ENTITY: &'static str = "inspection task";

    fn initial() -> Self {
        Self::Scheduled
    }

    fn all() -> &'static [Self] {
        &[
            Self::Scheduled,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        next.rank() > self.rank()
    }
}

status_display!(InspectionStatus);

// =============================================================================
// SEIZURE
// =============================================================================

/// Seizure lifecycle, advanced one user action at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeizureStatus {
    Pending,
    Dispatched,
    LabReceived,
    ReportGenerated,
    FirFiled,
}

impl SeizureStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Dispatched => 1,
            Self::LabReceived => 2,
            Self::ReportGenerated => 3,
            Self::FirFiled => 4,
        }
    }

    /// Still moving through the field/lab pipeline.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Dispatched | Self::LabReceived)
    }
}

impl StatusMachine for SeizureStatus {
    const ENTITY: &'static str = "seizure";

    fn initial() -> Self {
        Self::Pending
    }

    fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Dispatched,
            Self::LabReceived,
            Self::ReportGenerated,
            Self::FirFiled,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Dispatched => "dispatched",
            Self::LabReceived => "lab-received",
            Self::ReportGenerated => "report-generated",
            Self::FirFiled => "fir-filed",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        next.rank() > self.rank()
    }
}

status_display!(SeizureStatus);

// =============================================================================
// LAB SAMPLE
// =============================================================================

/// Lab sample lifecycle.
///
/// `violation` and `compliant` are sibling terminal outcomes; `completed` may
/// still be refined into either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabSampleStatus {
    InTransit,
    Received,
    Testing,
    Completed,
    Violation,
    Compliant,
}

impl LabSampleStatus {
    fn rank(self) -> u8 {
        match self {
            Self::InTransit => 0,
            Self::Received => 1,
            Self::Testing => 2,
            Self::Completed => 3,
            Self::Violation | Self::Compliant => 4,
        }
    }

    /// Awaiting a result.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::InTransit | Self::Received | Self::Testing)
    }
}

impl StatusMachine for LabSampleStatus {
    const ENTITY: &'static str = "lab sample";

    fn initial() -> Self {
        Self::InTransit
    }

    fn all() -> &'static [Self] {
        &[
            Self::InTransit,
            Self::Received,
            Self::Testing,
            Self::Completed,
            Self::Violation,
            Self::Compliant,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::InTransit => "in-transit",
            Self::Received => "received",
            Self::Testing => "testing",
            Self::Completed => "completed",
            Self::Violation => "violation",
            Self::Compliant => "compliant",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        next.rank() > self.rank()
    }
}

status_display!(LabSampleStatus);

// =============================================================================
// FIR CASE
// =============================================================================

/// FIR case lifecycle. `closed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirStatus {
    Draft,
    Submitted,
    PendingCourt,
    Closed,
}

impl FirStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Submitted => 1,
            Self::PendingCourt => 2,
            Self::Closed => 3,
        }
    }
}

impl StatusMachine for FirStatus {
    const ENTITY: &'static str = "FIR case";

    fn initial() -> Self {
        Self::Draft
    }

    fn all() -> &'static [Self] {
        &[
            Self::Draft,
            Self::Submitted,
            Self::PendingCourt,
            Self::Closed,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::PendingCourt => "pending-court",
            Self::Closed => "closed",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        next.rank() > self.rank()
    }
}

status_display!(FirStatus);

// =============================================================================
// FORM SUBMISSION
// =============================================================================

/// Review lifecycle of a forms-portal submission.
///
/// Unlike the enforcement records this is not a straight line: a submission
/// returned for update, or rejected, goes back to `pending` once the applicant
/// resubmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    PendingUpdate,
}

impl SubmissionStatus {
    /// Display label used by the submissions table.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::PendingUpdate => "Pending Update",
        }
    }
}

impl StatusMachine for SubmissionStatus {
    const ENTITY: &'static str = "submission";

    fn initial() -> Self {
        Self::Pending
    }

    fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::UnderReview,
            Self::Approved,
            Self::Rejected,
            Self::PendingUpdate,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under-review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::PendingUpdate => "pending-update",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::UnderReview)
                | (Self::UnderReview, Self::Approved)
                | (Self::UnderReview, Self::Rejected)
                | (Self::UnderReview, Self::PendingUpdate)
                | (Self::PendingUpdate, Self::Pending)
                | (Self::Rejected, Self::Pending)
        )
    }
}

status_display!(SubmissionStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seizure_moves_forward_and_may_skip() {
        let status = SeizureStatus::Pending
            .transition(SeizureStatus::Dispatched)
            .unwrap();
        assert_eq!(status, SeizureStatus::Dispatched);
        assert!(status.can_transition_to(SeizureStatus::ReportGenerated));
        assert!(SeizureStatus::Pending.can_transition_to(SeizureStatus::FirFiled));
    }

    #[test]
    fn seizure_rejects_backward_and_self_transitions() {
        let err = SeizureStatus::FirFiled
            .transition(SeizureStatus::Pending)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal seizure status transition: fir-filed -> pending"
        );
        assert!(!SeizureStatus::Dispatched.can_transition_to(SeizureStatus::Dispatched));
    }

    #[test]
    fn closed_fir_cannot_reopen() {
        assert!(FirStatus::Closed.is_terminal());
        assert!(FirStatus::Closed.transition(FirStatus::Draft).is_err());
    }

    #[test]
    fn lab_outcomes_are_terminal_siblings() {
        assert!(LabSampleStatus::Completed.can_transition_to(LabSampleStatus::Violation));
        assert!(LabSampleStatus::Testing.can_transition_to(LabSampleStatus::Compliant));
        assert!(!LabSampleStatus::Violation.can_transition_to(LabSampleStatus::Compliant));
        assert!(LabSampleStatus::Compliant.is_terminal());
        assert!(!LabSampleStatus::Completed.is_terminal());
    }

    #[test]
    fn inspection_can_be_cancelled_until_finished() {
        assert!(InspectionStatus::Scheduled.can_transition_to(InspectionStatus::Cancelled));
        assert!(InspectionStatus::InProgress.can_transition_to(InspectionStatus::Cancelled));
        assert!(!InspectionStatus::Completed.can_transition_to(InspectionStatus::Cancelled));
    }

    #[test]
    fn submission_returns_to_pending_after_update() {
        assert!(SubmissionStatus::PendingUpdate.can_transition_to(SubmissionStatus::Pending));
        assert!(!SubmissionStatus::Approved.can_transition_to(SubmissionStatus::Pending));
        assert!(!SubmissionStatus::Pending.can_transition_to(SubmissionStatus::Approved));
    }

    #[test]
    fn statuses_parse_and_serialize_as_kebab_case() {
        assert_eq!(
            "lab-received".parse::<SeizureStatus>().unwrap(),
            SeizureStatus::LabReceived
        );
        assert_eq!(
            "Pending-Court".parse::<FirStatus>().unwrap(),
            FirStatus::PendingCourt
        );
        assert!("lost".parse::<LabSampleStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&LabSampleStatus::InTransit).unwrap(),
            "\"in-transit\""
        );
    }
}
