//! Export run types
//!
//! Options controlling a run, the records it accumulates, and the summary it
//! reports back.

use super::gpo::GpoStatus;
use super::phrases::MatchMode;
use serde::Serialize;
use std::path::PathBuf;

/// What to do when a single GPO report cannot be exported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failed export; no summary tables are written
    #[default]
    Abort,
    /// Log the failure, skip matching for that GPO, keep going
    Continue,
}

/// How the summary tables are opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableMode {
    /// Keep existing rows and add this run's rows after them
    #[default]
    Append,
    /// Replace the table with this run's rows
    Truncate,
}

/// Options for an export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Folder receiving report files and summary tables
    pub report_folder: PathBuf,
    /// Search phrases; `None` skips the settings table entirely
    pub phrases: Option<Vec<String>>,
    pub match_mode: MatchMode,
    pub failure_policy: FailurePolicy,
    pub table_mode: TableMode,
}

impl ExportOptions {
    pub fn new(report_folder: impl Into<PathBuf>) -> Self {
        Self {
            report_folder: report_folder.into(),
            phrases: None,
            match_mode: MatchMode::default(),
            failure_policy: FailurePolicy::default(),
            table_mode: TableMode::default(),
        }
    }
}

/// A phrase found in a GPO's report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub gpo_name: String,
    pub setting: String,
}

/// Status of one enumerated GPO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub gpo_name: String,
    pub status: GpoStatus,
}

/// A GPO whose report could not be exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFailure {
    pub gpo_name: String,
    pub gpo_id: String,
    pub message: String,
}

/// Result of an export run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub domain: String,
    pub server: String,
    pub gpo_count: usize,
    pub reports_written: Vec<PathBuf>,
    pub match_count: usize,
    pub failures: Vec<ExportFailure>,
    pub status_table: Option<PathBuf>,
    pub settings_table: Option<PathBuf>,
}

impl ExportSummary {
    pub fn new(domain: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            server: server.into(),
            ..Default::default()
        }
    }

    pub fn add_failure(&mut self, failure: ExportFailure) {
        self.failures.push(failure);
    }

    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}
