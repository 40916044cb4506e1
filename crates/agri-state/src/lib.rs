//! Agri Shield application state.
//!
//! [`AppState`] is the single owned store for the portal session: active
//! role and tab, the enforcement record collections, forms-portal drafts and
//! submissions, and the audit trail. Workflows and reports are implemented as
//! methods on the store; session files persist it between runs.

pub mod audit;
pub mod error;
pub mod events;
pub mod forms;
pub mod reports;
pub mod session;
pub mod store;
pub mod submissions;
pub mod workflow;

pub use audit::{AuditEntry, AuditLog};
pub use error::{Result, SessionError, SessionResult, StateError};
pub use events::{RecordKind, StateEvent, Subscribers};
pub use forms::FormSession;
pub use reports::{ActivityReport, DashboardStats, Metric, ReportKind, ScheduleDay};
pub use session::{SESSION_SCHEMA_VERSION, load_or_new, load_session, save_session};
pub use store::{AppState, StateData, UpdateOutcome};
pub use submissions::SubmissionFilter;
pub use workflow::{
    AuthenticityProbe, DEFAULT_GEO_LOCATION, LabResultOutcome, ProbeReading, ScanRequest,
    ScanResult, SeizureProtocol, SeizureRecords, SimulatedProbe, scan_fingerprint, scan_product,
    scan_product_at,
};
