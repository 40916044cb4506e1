//! Navigation tabs and their role gating.
//!
//! The tab list is static; which tabs a session may see is derived from the
//! active [`UserRole`] by filtering [`TABS`] on each tab's allowed-role list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::role::UserRole;

/// Identifier of a navigable application view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabId {
    AgriShieldDashboard,
    FormsDashboard,
    FormsCatalog,
    FormRenderer,
    FormSubmissions,
    FormReports,
    CropHealthReport,
    PlantingSchedule,
    InspectionPlanning,
    FieldExecution,
    SeizureLogging,
    LegalModule,
    LabInterface,
    SystemAudit,
    Settings,
}

impl TabId {
    /// Stable identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AgriShieldDashboard => "agri-shield-dashboard",
            Self::FormsDashboard => "forms-dashboard",
            Self::FormsCatalog => "forms-catalog",
            Self::FormRenderer => "form-renderer",
            Self::FormSubmissions => "form-submissions",
            Self::FormReports => "form-reports",
            Self::CropHealthReport => "crop-health-report",
            Self::PlantingSchedule => "planting-schedule",
            Self::InspectionPlanning => "inspection-planning",
            Self::FieldExecution => "field-execution",
            Self::SeizureLogging => "seizure-logging",
            Self::LegalModule => "legal-module",
            Self::LabInterface => "lab-interface",
            Self::SystemAudit => "system-audit",
            Self::Settings => "settings",
        }
    }

    /// Static definition for this tab.
    pub fn definition(&self) -> &'static TabDefinition {
        TABS.iter()
            .find(|tab| tab.id == *self)
            .unwrap_or(&TABS[0])
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::AgriShieldDashboard
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TABS.iter()
            .map(|tab| tab.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ModelError::unknown("tab", s))
    }
}

/// Static description of a navigation tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabDefinition {
    pub id: TabId,
    pub text: &'static str,
    pub aria_label: &'static str,
    pub allowed_roles: &'static [UserRole],
    /// Navigable but never listed in the sidebar.
    pub hidden_in_sidebar: bool,
}

impl TabDefinition {
    /// Whether `role` may open this tab.
    pub fn allows(&self, role: UserRole) -> bool {
        self.allowed_roles.contains(&role)
    }
}

use UserRole::{
    Dao, Dealer, DistrictAdmin, Farmer, FieldOfficer, HqMonitoring, LabCoordinator, LegalOfficer,
};

const PORTAL_ROLES: &[UserRole] = &[Dao, FieldOfficer, Farmer, Dealer, HqMonitoring, DistrictAdmin];

/// Every tab in sidebar order.
pub static TABS: [TabDefinition; 15] = [
    TabDefinition {
        id: TabId::AgriShieldDashboard,
        text: "Agri Shield Dashboard",
        aria_label: "View Agri Shield monitoring dashboard",
        allowed_roles: &[Dao, HqMonitoring, DistrictAdmin],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::FormsDashboard,
        text: "Forms Dashboard",
        aria_label: "View Forms Dashboard",
        allowed_roles: PORTAL_ROLES,
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::FormsCatalog,
        text: "Forms Catalog",
        aria_label: "Browse and select forms",
        allowed_roles: PORTAL_ROLES,
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::FormRenderer,
        text: "Fill Form",
        aria_label: "Fill out a selected form",
        allowed_roles: PORTAL_ROLES,
        hidden_in_sidebar: true,
    },
    TabDefinition {
        id: TabId::FormSubmissions,
        text: "Form Submissions",
        aria_label: "View and manage form submissions",
        allowed_roles: PORTAL_ROLES,
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::FormReports,
        text: "Form Reports",
        aria_label: "Generate and view reports from form data",
        allowed_roles: &[Dao, HqMonitoring, DistrictAdmin],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::CropHealthReport,
        text: "AI Crop Health",
        aria_label: "Generate AI Crop Health Report",
        allowed_roles: &[Dao, HqMonitoring, FieldOfficer],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::PlantingSchedule,
        text: "AI Planting Schedule",
        aria_label: "Create AI Planting Schedule",
        allowed_roles: &[Dao, FieldOfficer, DistrictAdmin, Farmer],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::InspectionPlanning,
        text: "Inspection Planning",
        aria_label: "Plan inspection visits",
        allowed_roles: &[DistrictAdmin, Dao],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::FieldExecution,
        text: "Field Execution",
        aria_label: "Execute field inspections",
        allowed_roles: &[FieldOfficer, Dao],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::SeizureLogging,
        text: "Seizure Logging",
        aria_label: "Log seized items",
        allowed_roles: &[FieldOfficer, Dao],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::LegalModule,
        text: "Legal Module",
        aria_label: "Legal enforcement actions",
        allowed_roles: &[LegalOfficer, Dao],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::LabInterface,
        text: "Lab Interface",
        aria_label: "Lab sample tracking",
        allowed_roles: &[LabCoordinator, Dao],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::SystemAudit,
        text: "System Audit",
        aria_label: "View system reports and audit logs",
        allowed_roles: &[HqMonitoring, Dao, DistrictAdmin],
        hidden_in_sidebar: false,
    },
    TabDefinition {
        id: TabId::Settings,
        text: "Settings",
        aria_label: "Manage application settings",
        allowed_roles: &[
            Dao,
            FieldOfficer,
            Farmer,
            Dealer,
            HqMonitoring,
            DistrictAdmin,
            LegalOfficer,
            LabCoordinator,
        ],
        hidden_in_sidebar: false,
    },
];

/// Tabs `role` may open, in sidebar order (hidden tabs included).
pub fn allowed_tabs_for(role: UserRole) -> Vec<&'static TabDefinition> {
    TABS.iter().filter(|tab| tab.allows(role)).collect()
}

/// Tab a session should fall back to: the first allowed tab shown in the
/// sidebar, else the first allowed tab at all.
pub fn fallback_tab(allowed: &[&'static TabDefinition]) -> Option<TabId> {
    allowed
        .iter()
        .find(|tab| !tab.hidden_in_sidebar)
        .or_else(|| allowed.first())
        .map(|tab| tab.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tab_round_trips_through_its_identifier() {
        for tab in &TABS {
            assert_eq!(tab.id.as_str().parse::<TabId>().unwrap(), tab.id);
            assert_eq!(tab.id.definition().id, tab.id);
        }
    }

    #[test]
    fn legal_officer_sees_legal_module_and_settings_only() {
        let ids: Vec<TabId> = allowed_tabs_for(UserRole::LegalOfficer)
            .iter()
            .map(|tab| tab.id)
            .collect();
        assert_eq!(ids, vec![TabId::LegalModule, TabId::Settings]);
    }

    #[test]
    fn fallback_skips_hidden_tabs() {
        let allowed = vec![TabId::FormRenderer.definition(), TabId::Settings.definition()];
        assert_eq!(fallback_tab(&allowed), Some(TabId::Settings));

        let only_hidden = vec![TabId::FormRenderer.definition()];
        assert_eq!(fallback_tab(&only_hidden), Some(TabId::FormRenderer));

        assert_eq!(fallback_tab(&[]), None);
    }

    #[test]
    fn every_role_has_at_least_one_tab() {
        for role in UserRole::all() {
            assert!(!allowed_tabs_for(*role).is_empty(), "{role} has no tabs");
        }
    }
}
