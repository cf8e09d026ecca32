use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Activation state of a GPO's user and computer halves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpoStatus {
    AllSettingsEnabled,
    UserSettingsDisabled,
    ComputerSettingsDisabled,
    AllSettingsDisabled,
}

impl FromStr for GpoStatus {
    type Err = String;

    /// Parse status from its GroupPolicy module name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allsettingsenabled" => Ok(GpoStatus::AllSettingsEnabled),
            "usersettingsdisabled" => Ok(GpoStatus::UserSettingsDisabled),
            "computersettingsdisabled" => Ok(GpoStatus::ComputerSettingsDisabled),
            "allsettingsdisabled" => Ok(GpoStatus::AllSettingsDisabled),
            _ => Err(format!("Unknown GPO status '{}'", s)),
        }
    }
}

impl fmt::Display for GpoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpoStatus::AllSettingsEnabled => write!(f, "AllSettingsEnabled"),
            GpoStatus::UserSettingsDisabled => write!(f, "UserSettingsDisabled"),
            GpoStatus::ComputerSettingsDisabled => write!(f, "ComputerSettingsDisabled"),
            GpoStatus::AllSettingsDisabled => write!(f, "AllSettingsDisabled"),
        }
    }
}

/// A GPO as returned by enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpoReference {
    pub id: String,
    pub display_name: String,
    pub status: GpoStatus,
}

impl GpoReference {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, status: GpoStatus) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            status,
        }
    }
}

/// Case-insensitive display name order, ties broken by raw name then id
pub fn compare_display_names(a: &GpoReference, b: &GpoReference) -> Ordering {
    a.display_name
        .to_lowercase()
        .cmp(&b.display_name.to_lowercase())
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_by_display_name(gpos: &mut [GpoReference]) {
    gpos.sort_by(compare_display_names);
}

/// Exported report content for one GPO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpoReport {
    pub gpo_id: String,
    pub content: String,
}

impl GpoReport {
    pub fn new(gpo_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            gpo_id: gpo_id.into(),
            content: content.into(),
        }
    }
}

/// Domain and server every directory call runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryContext {
    pub domain: String,
    pub server: Option<String>,
}

impl DirectoryContext {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            server: None,
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }
}
