//! Simulated user roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Identity the portal is operating as.
///
/// Roles gate which navigation tabs are visible (see [`crate::tab`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    /// Field officer executing inspections.
    FieldOfficer,
    /// District Agricultural Officer.
    #[default]
    Dao,
    /// Legal officer handling FIR cases.
    LegalOfficer,
    /// Lab coordinator recording sample results.
    LabCoordinator,
    /// HQ monitoring cell.
    HqMonitoring,
    /// District administration.
    DistrictAdmin,
    /// Farmer using the forms portal.
    Farmer,
    /// Dealer or retailer using the forms portal.
    Dealer,
}

impl UserRole {
    /// Stable identifier used on the command line and in session files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FieldOfficer => "field-officer",
            Self::Dao => "dao",
            Self::LegalOfficer => "legal-officer",
            Self::LabCoordinator => "lab-coordinator",
            Self::HqMonitoring => "hq-monitoring",
            Self::DistrictAdmin => "district-admin",
            Self::Farmer => "farmer",
            Self::Dealer => "dealer",
        }
    }

    /// Display name.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FieldOfficer => "Field Officer",
            Self::Dao => "District Agricultural Officer",
            Self::LegalOfficer => "Legal Officer",
            Self::LabCoordinator => "Lab Coordinator",
            Self::HqMonitoring => "HQ Monitoring Cell",
            Self::DistrictAdmin => "District Admin",
            Self::Farmer => "Farmer",
            Self::Dealer => "Dealer/Retailer",
        }
    }

    /// All roles in declaration order.
    pub const fn all() -> &'static [UserRole] {
        &[
            Self::FieldOfficer,
            Self::Dao,
            Self::LegalOfficer,
            Self::LabCoordinator,
            Self::HqMonitoring,
            Self::DistrictAdmin,
            Self::Farmer,
            Self::Dealer,
        ]
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UserRole {
    type Err = ModelError;

    /// Accepts either the identifier or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|role| {
                role.as_str().eq_ignore_ascii_case(needle)
                    || role.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ModelError::unknown("role", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifier_and_label() {
        assert_eq!("dao".parse::<UserRole>().unwrap(), UserRole::Dao);
        assert_eq!(
            "Dealer/Retailer".parse::<UserRole>().unwrap(),
            UserRole::Dealer
        );
        assert_eq!(
            " LAB-COORDINATOR ".parse::<UserRole>().unwrap(),
            UserRole::LabCoordinator
        );
        assert!("auditor".parse::<UserRole>().is_err());
    }

    #[test]
    fn default_is_district_agricultural_officer() {
        assert_eq!(UserRole::default(), UserRole::Dao);
    }
}
