//! Domain model for the Agri Shield regulatory portal.
//!
//! Roles and the tabs they unlock, enforcement records with their status
//! machines, the genuine-product reference database, and the forms-portal
//! catalog, schema and submissions.

pub mod error;
pub mod forms;
pub mod ids;
pub mod product;
pub mod records;
pub mod role;
pub mod status;
pub mod submission;
pub mod tab;

pub use error::{ModelError, Result};
pub use forms::{
    FORM_CATALOG, FORM_STEPS, FieldKind, FieldSpec, FieldValue, FormDefinition, FormStep,
    FormType, STEP_COUNT, find_field, validate_field,
};
pub use ids::{IdGenerator, IdPrefix, RecordId};
pub use product::{Mrp, PRODUCT_DATABASE, ProductCategory, ProductRecord, brands, find_product};
pub use records::{
    AUTHENTIC_THRESHOLD, AuthenticityScore, Equipment, FirCase, InspectionTask, LabSample,
    NewFirCase, NewInspectionTask, NewLabSample, Seizure, SeizureDetails, TargetType,
};
pub use role::UserRole;
pub use status::{
    FirStatus, InspectionStatus, LabSampleStatus, SeizureStatus, StatusMachine, SubmissionStatus,
};
pub use submission::Submission;
pub use tab::{TABS, TabDefinition, TabId, allowed_tabs_for, fallback_tab};
