//! Dashboard figures, the weekly visit calendar and activity reports.

use std::fmt;
use std::str::FromStr;

use agri_model::{FirStatus, InspectionTask, LabSampleStatus, ModelError};
use chrono::{DateTime, Datelike, Duration, Months, Utc, Weekday};
use serde::Serialize;

use crate::store::AppState;

// =============================================================================
// DASHBOARD
// =============================================================================

/// Headline figures on the monitoring dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_inspections: usize,
    pub active_seizures: usize,
    pub pending_lab_samples: usize,
    pub open_fir_cases: usize,
    /// Percent of inspections without a seizure; `None` with no inspections.
    pub compliance_rate: Option<f64>,
}

impl DashboardStats {
    /// `"92.5%"`, or `"N/A"` with no inspections.
    pub fn compliance_label(&self) -> String {
        match self.compliance_rate {
            Some(rate) => format!("{rate:.1}%"),
            None => "N/A".to_string(),
        }
    }
}

fn compliance_rate(inspections: usize, seizures: usize) -> Option<f64> {
    if inspections == 0 {
        return None;
    }
    let inspections = inspections as f64;
    Some((inspections - seizures as f64) / inspections * 100.0)
}

// =============================================================================
// WEEKLY CALENDAR
// =============================================================================

/// Visits shown per weekday on the planning calendar.
const WEEKLY_SLOTS: [(Weekday, usize); 5] = [
    (Weekday::Mon, 2),
    (Weekday::Tue, 1),
    (Weekday::Wed, 2),
    (Weekday::Thu, 1),
    (Weekday::Fri, 2),
];

/// One weekday column of the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDay<'a> {
    pub day: Weekday,
    pub tasks: Vec<&'a InspectionTask>,
}

impl ScheduleDay<'_> {
    pub fn day_name(&self) -> &'static str {
        match self.day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

// =============================================================================
// ACTIVITY REPORTS
// =============================================================================

/// Reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
}

impl ReportKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ModelError::UnknownValue {
                kind: "report kind",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

impl Metric {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityReport {
    pub kind: ReportKind,
    pub title: &'static str,
    pub description: &'static str,
    pub metrics: Vec<Metric>,
}

/// `1234567` as `"12,34,567"` (Indian digit grouping).
fn format_rupees(amount: f64) -> String {
    let whole = amount.round().max(0.0) as u64;
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, back) = rest.split_at(rest.len() - 2);
        groups.push(back);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();
    format!("₹{},{tail}", groups.join(","))
}

impl AppState {
    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            total_inspections: self.inspection_tasks().len(),
            active_seizures: self
                .seizures()
                .iter()
                .filter(|s| s.status.is_active())
                .count(),
            pending_lab_samples: self
                .lab_samples()
                .iter()
                .filter(|s| s.status.is_pending())
                .count(),
            open_fir_cases: self
                .fir_cases()
                .iter()
                .filter(|c| c.status != FirStatus::Closed)
                .count(),
            compliance_rate: compliance_rate(self.inspection_tasks().len(), self.seizures().len()),
        }
    }

    /// Inspection visits grouped Monday to Friday by scheduled weekday.
    pub fn weekly_schedule(&self) -> Vec<ScheduleDay<'_>> {
        WEEKLY_SLOTS
            .iter()
            .map(|(day, slots)| ScheduleDay {
                day: *day,
                tasks: self
                    .inspection_tasks()
                    .iter()
                    .filter(|task| task.scheduled_at.weekday() == *day)
                    .take(*slots)
                    .collect(),
            })
            .collect()
    }

    /// Activity report for the period ending at `now`.
    pub fn activity_report(&self, kind: ReportKind, now: DateTime<Utc>) -> ActivityReport {
        match kind {
            ReportKind::Daily => self.daily_report(now),
            ReportKind::Weekly => self.weekly_report(now),
            ReportKind::Monthly => self.monthly_report(now),
        }
    }

    fn daily_report(&self, now: DateTime<Utc>) -> ActivityReport {
        let today = now.date_naive();
        let inspections = self
            .inspection_tasks()
            .iter()
            .filter(|t| t.scheduled_at.date() == today)
            .count();
        let samples = self
            .lab_samples()
            .iter()
            .filter(|s| s.details.timestamp.date_naive() == today)
            .count();
        let seizures = self
            .seizures()
            .iter()
            .filter(|s| s.details.timestamp.date_naive() == today)
            .count();
        let drafts = self
            .fir_cases()
            .iter()
            .filter(|c| c.status == FirStatus::Draft)
            .count();

        ActivityReport {
            kind: ReportKind::Daily,
            title: "Daily Activity Report",
            description: "Summary of activities for today.",
            metrics: vec![
                Metric::new("Inspections Scheduled Today", inspections),
                Metric::new("Samples Collected Today", samples),
                Metric::new("New Seizures", seizures),
                Metric::new("New FIRs Drafted", drafts),
            ],
        }
    }

    fn weekly_report(&self, now: DateTime<Utc>) -> ActivityReport {
        let week_ago = (now - Duration::days(7)).naive_utc();
        let inspections = self
            .inspection_tasks()
            .iter()
            .filter(|t| t.scheduled_at > week_ago)
            .count();

        ActivityReport {
            kind: ReportKind::Weekly,
            title: "Weekly Performance Report",
            description: "Performance overview for the last 7 days.",
            metrics: vec![
                Metric::new("Total Inspections", inspections),
                Metric::new("Compliance Rate", self.dashboard_stats().compliance_label()),
            ],
        }
    }

    fn monthly_report(&self, now: DateTime<Utc>) -> ActivityReport {
        let month_ago = now
            .checked_sub_months(Months::new(1))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let recent_seizures: Vec<_> = self
            .seizures()
            .iter()
            .filter(|s| s.details.timestamp > month_ago)
            .collect();
        let violations = self
            .lab_samples()
            .iter()
            .filter(|s| s.status == LabSampleStatus::Violation && s.details.timestamp > month_ago)
            .count();
        let legal_actions = self
            .fir_cases()
            .iter()
            .filter(|c| c.status != FirStatus::Draft)
            .count();
        let seized_value: f64 = recent_seizures
            .iter()
            .filter_map(|s| s.details.estimated_amount())
            .sum();

        ActivityReport {
            kind: ReportKind::Monthly,
            title: "Monthly Analytics Report",
            description: "In-depth analytics for the past month.",
            metrics: vec![
                Metric::new("Total Seizures", recent_seizures.len()),
                Metric::new("Lab Violation Confirmations", violations),
                Metric::new("Legal Actions Initiated", legal_actions),
                Metric::new("Est. Value of Seized Goods", format_rupees(seized_value)),
            ],
        }
    }
}
