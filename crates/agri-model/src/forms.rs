//! Forms portal: catalog, step schema and typed field values.
//!
//! Every catalog form is filled through the same three-step schema. Field
//! values are checked against the schema when they are written, so a stored
//! value map is always well-formed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Regulatory form available in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormType {
    #[serde(rename = "fertilizerLicense")]
    FertilizerLicense,
    #[serde(rename = "formA1")]
    FormA1,
    #[serde(rename = "inspectionFertilizer")]
    InspectionFertilizer,
    #[serde(rename = "formV")]
    FormV,
    #[serde(rename = "formIV")]
    FormIv,
    #[serde(rename = "inspectionInsecticide")]
    InspectionInsecticide,
}

impl FormType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FertilizerLicense => "fertilizerLicense",
            Self::FormA1 => "formA1",
            Self::InspectionFertilizer => "inspectionFertilizer",
            Self::FormV => "formV",
            Self::FormIv => "formIV",
            Self::InspectionInsecticide => "inspectionInsecticide",
        }
    }

    /// Catalog entry for this form.
    pub fn definition(&self) -> &'static FormDefinition {
        FORM_CATALOG
            .iter()
            .find(|form| form.form_type == *self)
            .unwrap_or(&FORM_CATALOG[0])
    }

    /// Short label shown in the submissions list.
    pub const fn submission_label(&self) -> &'static str {
        match self {
            Self::FertilizerLicense => "Fertilizer Sale License",
            Self::FormA1 => "Form A1 - Memorandum",
            Self::InspectionFertilizer => "Inspection Report - Fertilizer",
            Self::FormV => "Form V - Inspector Forms",
            Self::FormIv => "Form IV - Analyst Report",
            Self::InspectionInsecticide => "Inspection Report - Insecticide",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        FORM_CATALOG
            .iter()
            .map(|form| form.form_type)
            .find(|form| form.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ModelError::unknown("form type", s))
    }
}

/// Catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormDefinition {
    pub form_type: FormType,
    pub title: &'static str,
    pub description: &'static str,
}

pub static FORM_CATALOG: [FormDefinition; 6] = [
    FormDefinition {
        form_type: FormType::FertilizerLicense,
        title: "Fertilizer Sale License Application",
        description: "Application for obtaining new letter of Authorization (Sale License) for Self Manufactured/Imported fertilizers.",
    },
    FormDefinition {
        form_type: FormType::FormA1,
        title: "Form A1 - Memorandum of Intimation",
        description: "Declaration form as per clause 8(2) of FCO 1985 for fertilizer registration.",
    },
    FormDefinition {
        form_type: FormType::InspectionFertilizer,
        title: "Fertilizer Manufacturing Inspection Report",
        description: "Inspection report for fertilizer manufacturing units.",
    },
    FormDefinition {
        form_type: FormType::FormV,
        title: "Form V - Inspector Forms",
        description: "Forms used by insecticide inspectors for sample collection, seizure notices, etc.",
    },
    FormDefinition {
        form_type: FormType::FormIv,
        title: "Form IV - Insecticide Analyst Report",
        description: "Standard report format for analysis of insecticide samples by analysts.",
    },
    FormDefinition {
        form_type: FormType::InspectionInsecticide,
        title: "Insecticide Manufacturing Inspection",
        description: "Proforma for inspection of insecticides manufacturing units.",
    },
];

// =============================================================================
// SCHEMA
// =============================================================================

/// Input control and the value it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Number,
    Textarea,
    Select(&'static [&'static str]),
    File,
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStep {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, label, kind }
}

pub static FORM_STEPS: [FormStep; 3] = [
    FormStep {
        title: "Applicant Information",
        fields: &[
            field("fullName", "Full Name", FieldKind::Text),
            field("aadharNumber", "Aadhar Number", FieldKind::Text),
            field("panNumber", "PAN Number", FieldKind::Text),
            field("education", "Educational Qualification", FieldKind::Text),
            field("mobileNumber", "Mobile Number", FieldKind::Tel),
            field("email", "Email Address", FieldKind::Email),
            field("address", "Complete Address", FieldKind::Textarea),
            field("aadharUpload", "Aadhar Card", FieldKind::File),
            field("panUpload", "PAN Card", FieldKind::File),
        ],
    },
    FormStep {
        title: "Business Details",
        fields: &[
            field("businessName", "Business Name", FieldKind::Text),
            field(
                "businessType",
                "Type of Business",
                FieldKind::Select(&["proprietorship", "partnership", "limited", "cooperative"]),
            ),
            field("registrationNumber", "Registration Number", FieldKind::Text),
            field("gstNumber", "GST Number", FieldKind::Text),
            field("salePointAddress", "Sale Point Address", FieldKind::Textarea),
            field("storageAddress", "Godown/Storage Address", FieldKind::Textarea),
            field(
                "premisesOwnership",
                "Premises Ownership",
                FieldKind::Select(&["owned", "rented"]),
            ),
            field("premisesSize", "Premises Size (sq. ft.)", FieldKind::Number),
            field("responsiblePersonName", "Responsible Person Name", FieldKind::Text),
            field(
                "responsiblePersonDesignation",
                "Responsible Person Designation",
                FieldKind::Text,
            ),
            field(
                "responsiblePersonQualification",
                "Responsible Person Qualification",
                FieldKind::Text,
            ),
            field("responsiblePersonContact", "Responsible Person Contact", FieldKind::Tel),
        ],
    },
    FormStep {
        title: "Documents & Submission",
        fields: &[
            field(
                "paymentMethod",
                "Payment Method",
                FieldKind::Select(&["challan", "bankChallan", "demandDraft"]),
            ),
            field("paymentReference", "Reference/UTR Number", FieldKind::Text),
            field("paymentDate", "Payment Date", FieldKind::Date),
            field("paymentAmount", "Amount Paid (Rs.)", FieldKind::Number),
            field("formA1Upload", "Duly filled Form A-1", FieldKind::File),
            field(
                "declaration",
                "I declare that the information given is true...",
                FieldKind::Checkbox,
            ),
        ],
    },
];

/// Number of steps in the form wizard.
pub const STEP_COUNT: usize = FORM_STEPS.len();

/// Look a field up by name across all steps.
pub fn find_field(name: &str) -> Option<&'static FieldSpec> {
    FORM_STEPS
        .iter()
        .flat_map(|step| step.fields.iter())
        .find(|spec| spec.name == name)
}

// =============================================================================
// VALUES
// =============================================================================

/// A single stored form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    /// Name of an uploaded file.
    File(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::File(text) => f.write_str(text),
            Self::Flag(true) => f.write_str("yes"),
            Self::Flag(false) => f.write_str("no"),
        }
    }
}

impl FieldSpec {
    /// Check that `value` is acceptable for this field.
    pub fn check(&self, value: &FieldValue) -> Result<()> {
        match (self.kind, value) {
            (FieldKind::Checkbox, FieldValue::Flag(_)) => Ok(()),
            (FieldKind::File, FieldValue::File(name)) => {
                if name.trim().is_empty() {
                    Err(ModelError::invalid_field(self.name, "file name is empty"))
                } else {
                    Ok(())
                }
            }
            (FieldKind::Checkbox | FieldKind::File, _) => Err(ModelError::invalid_field(
                self.name,
                format!("expected a {} value", self.kind_name()),
            )),
            (_, FieldValue::Text(text)) => self.check_text(text),
            (_, _) => Err(ModelError::invalid_field(self.name, "expected a text value")),
        }
    }

    /// Parse raw command-line input into the value kind this field stores.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue> {
        let value = match self.kind {
            FieldKind::Checkbox => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => FieldValue::Flag(true),
                "false" | "no" | "0" | "off" => FieldValue::Flag(false),
                _ => {
                    return Err(ModelError::invalid_field(
                        self.name,
                        format!("{raw:?} is not a yes/no value"),
                    ));
                }
            },
            FieldKind::File => FieldValue::File(raw.to_string()),
            _ => FieldValue::Text(raw.to_string()),
        };
        self.check(&value)?;
        Ok(value)
    }

    fn check_text(&self, text: &str) -> Result<()> {
        let trimmed = text.trim();
        match self.kind {
            FieldKind::Number if trimmed.parse::<f64>().is_err() => Err(
                ModelError::invalid_field(self.name, format!("{text:?} is not a number")),
            ),
            FieldKind::Date if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() => Err(
                ModelError::invalid_field(self.name, format!("{text:?} is not a YYYY-MM-DD date")),
            ),
            FieldKind::Email if !trimmed.contains('@') => Err(ModelError::invalid_field(
                self.name,
                format!("{text:?} is not an email address"),
            )),
            FieldKind::Tel
                if trimmed.is_empty()
                    || !trimmed
                        .chars()
                        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ')) =>
            {
                Err(ModelError::invalid_field(
                    self.name,
                    format!("{text:?} is not a phone number"),
                ))
            }
            FieldKind::Select(options) if !options.contains(&trimmed) => {
                Err(ModelError::invalid_field(
                    self.name,
                    format!("{text:?} is not one of {}", options.join(", ")),
                ))
            }
            _ => Ok(()),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            FieldKind::Checkbox => "yes/no",
            FieldKind::File => "file",
            _ => "text",
        }
    }
}

/// Validate a named value against the schema.
pub fn validate_field(name: &str, value: &FieldValue) -> Result<&'static FieldSpec> {
    let spec =
        find_field(name).ok_or_else(|| ModelError::invalid_field(name, "unknown field"))?;
    spec.check(value)?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_round_trip() {
        for form in &FORM_CATALOG {
            let parsed: FormType = form.form_type.as_str().parse().unwrap();
            assert_eq!(parsed, form.form_type);
        }
        assert_eq!("formA1".parse::<FormType>().unwrap(), FormType::FormA1);
        assert!("formZ".parse::<FormType>().is_err());
    }

    #[test]
    fn select_fields_only_accept_listed_options() {
        let ok = validate_field("businessType", &FieldValue::Text("partnership".into()));
        assert!(ok.is_ok());
        let err = validate_field("businessType", &FieldValue::Text("trust".into())).unwrap_err();
        assert!(err.to_string().contains("not one of"));
    }

    #[test]
    fn value_kind_must_match_field() {
        assert!(validate_field("declaration", &FieldValue::Flag(true)).is_ok());
        assert!(validate_field("declaration", &FieldValue::Text("yes".into())).is_err());
        assert!(validate_field("panUpload", &FieldValue::File("pan.pdf".into())).is_ok());
        assert!(validate_field("fullName", &FieldValue::Flag(false)).is_err());
    }

    #[test]
    fn typed_text_fields_are_checked() {
        assert!(validate_field("premisesSize", &FieldValue::Text("2500".into())).is_ok());
        assert!(validate_field("premisesSize", &FieldValue::Text("big".into())).is_err());
        assert!(validate_field("paymentDate", &FieldValue::Text("2024-05-01".into())).is_ok());
        assert!(validate_field("paymentDate", &FieldValue::Text("01/05/2024".into())).is_err());
        assert!(validate_field("mobileNumber", &FieldValue::Text("+91 98765".into())).is_ok());
        assert!(validate_field("email", &FieldValue::Text("nobody".into())).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = validate_field("favouriteColour", &FieldValue::Text("green".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for field favouriteColour: unknown field"
        );
    }

    #[test]
    fn parse_value_reads_checkbox_words() {
        let spec = find_field("declaration").unwrap();
        assert_eq!(spec.parse_value("yes").unwrap(), FieldValue::Flag(true));
        assert!(spec.parse_value("maybe").is_err());
    }

    #[test]
    fn schema_has_three_steps() {
        assert_eq!(STEP_COUNT, 3);
        assert_eq!(FORM_STEPS[1].title, "Business Details");
    }
}
