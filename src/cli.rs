use crate::domain::{split_phrases, ExportOptions, FailurePolicy, MatchMode, TableMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gpo-export",
    version,
    about = "Export every GPO report in a domain and summarize status and matching settings"
)]
pub struct Cli {
    #[arg(
        long = "DomainName",
        visible_alias = "domain-name",
        short = 'd',
        help = "Fully-qualified name of the domain to query"
    )]
    pub domain_name: String,

    #[arg(
        long = "ReportFolder",
        visible_alias = "report-folder",
        short = 'o',
        help = "Folder for report files and summary tables (created if missing)"
    )]
    pub report_folder: PathBuf,

    #[arg(
        long = "GPOsettings",
        visible_alias = "gpo-settings",
        short = 's',
        help = "Semicolon-separated phrases to search for in each report"
    )]
    pub gpo_settings: Option<String>,

    #[arg(long, help = "Query this domain controller instead of discovering one")]
    pub server: Option<String>,

    #[arg(long, help = "Treat search phrases as case-insensitive regular expressions")]
    pub regex: bool,

    #[arg(long, help = "Log failed report exports and keep going")]
    pub continue_on_error: bool,

    #[arg(long, help = "Replace the summary tables instead of appending to them")]
    pub truncate: bool,

    #[arg(long, help = "Print the run summary as JSON")]
    pub json: bool,

    #[arg(long, help = "Directory for gpo-export.log (default: next to the executable)")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            report_folder: self.report_folder.clone(),
            phrases: self
                .gpo_settings
                .as_deref()
                .map(|raw| split_phrases(Some(raw))),
            match_mode: if self.regex {
                MatchMode::Regex
            } else {
                MatchMode::Literal
            },
            failure_policy: if self.continue_on_error {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
            table_mode: if self.truncate {
                TableMode::Truncate
            } else {
                TableMode::Append
            },
        }
    }
}
