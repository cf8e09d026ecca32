//! GPO report export
//!
//! Resolves a domain controller, lists every GPO, exports each report to the
//! report folder, then writes the status table and (when phrases were given)
//! the settings table.

use crate::domain::{
    sort_by_display_name, DirectoryContext, ExportFailure, ExportOptions, ExportSummary,
    FailurePolicy, GpoReference, GpoReport, MatchRecord, PhraseMatcher, StatusRecord,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{
    ensure_report_folder, plan_report_paths, resolve_context, write_report, write_settings_table,
    write_status_table, DirectoryService,
};
use std::path::Path;

/// Run a full export against `domain`.
///
/// `server` skips discovery when given. Export failures under
/// `FailurePolicy::Continue` are recorded in the summary; every other
/// failure is returned as an error and nothing is written to the tables.
pub fn export_gpo_reports(
    directory: &dyn DirectoryService,
    domain: &str,
    server: Option<&str>,
    options: &ExportOptions,
) -> AppResult<ExportSummary> {
    // Bad phrases are reported before touching the directory
    let matcher = options
        .phrases
        .as_ref()
        .map(|phrases| PhraseMatcher::new(phrases, options.match_mode))
        .transpose()?;

    let ctx = resolve_context(directory, domain, server)?;
    let gpos = list_sorted_gpos(directory, &ctx)?;
    tracing::info!(domain = %ctx.domain, count = gpos.len(), "Enumerated GPOs");

    ensure_report_folder(&options.report_folder)?;
    let paths = plan_report_paths(&options.report_folder, &gpos);

    let mut summary = ExportSummary::new(&ctx.domain, ctx.server.clone().unwrap_or_default());
    summary.gpo_count = gpos.len();

    let mut status_records = Vec::with_capacity(gpos.len());
    let mut match_records = Vec::new();

    for (index, (gpo, path)) in gpos.iter().zip(&paths).enumerate() {
        tracing::info!(
            gpo = %gpo.display_name,
            id = %gpo.id,
            index = index + 1,
            total = gpos.len(),
            "Exporting GPO report"
        );

        status_records.push(StatusRecord {
            gpo_name: gpo.display_name.clone(),
            status: gpo.status,
        });

        let report = match export_report(directory, &ctx, gpo, path) {
            Ok(report) => report,
            Err(e) => match options.failure_policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Continue => {
                    tracing::warn!(error = %e, "Skipping GPO after failed export");
                    summary.add_failure(ExportFailure {
                        gpo_name: gpo.display_name.clone(),
                        gpo_id: gpo.id.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            },
        };
        summary.reports_written.push(path.clone());

        if let Some(matcher) = &matcher {
            for phrase in matcher.matches(&report.content) {
                tracing::debug!(gpo = %gpo.display_name, phrase, "Phrase found in report");
                match_records.push(MatchRecord {
                    gpo_name: gpo.display_name.clone(),
                    setting: phrase.to_string(),
                });
            }
        }
    }

    summary.match_count = match_records.len();
    write_tables(
        &options.report_folder,
        options,
        matcher.is_some(),
        &status_records,
        &match_records,
        &mut summary,
    )?;

    if summary.success() {
        tracing::info!(
            reports = summary.reports_written.len(),
            matches = summary.match_count,
            "Export complete"
        );
    } else {
        tracing::warn!(
            reports = summary.reports_written.len(),
            failures = summary.failures.len(),
            "Export finished with failures"
        );
    }

    Ok(summary)
}

fn list_sorted_gpos(
    directory: &dyn DirectoryService,
    ctx: &DirectoryContext,
) -> AppResult<Vec<GpoReference>> {
    let mut gpos = directory.list_gpos(ctx).map_err(|e| AppError::Enumeration {
        domain: ctx.domain.clone(),
        message: e.to_string(),
    })?;
    sort_by_display_name(&mut gpos);
    Ok(gpos)
}

/// Fetch one report and write it to `path`
fn export_report(
    directory: &dyn DirectoryService,
    ctx: &DirectoryContext,
    gpo: &GpoReference,
    path: &Path,
) -> AppResult<GpoReport> {
    let export_error = |message: String| AppError::Export {
        gpo_name: gpo.display_name.clone(),
        gpo_id: gpo.id.clone(),
        message,
    };

    let report = directory
        .get_gpo_report(&gpo.id, ctx)
        .map_err(|e| export_error(e.to_string()))?;
    tracing::debug!(
        gpo_id = %report.gpo_id,
        bytes = report.content.len(),
        path = %path.display(),
        "Writing report"
    );
    write_report(path, &report).map_err(|e| export_error(e.to_string()))?;
    Ok(report)
}

fn write_tables(
    folder: &Path,
    options: &ExportOptions,
    has_phrases: bool,
    status_records: &[StatusRecord],
    match_records: &[MatchRecord],
    summary: &mut ExportSummary,
) -> AppResult<()> {
    if has_phrases {
        summary.settings_table = Some(write_settings_table(folder, match_records, options.table_mode)?);
    }
    summary.status_table = Some(write_status_table(folder, status_records, options.table_mode)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{split_phrases, GpoStatus};
    use std::cell::RefCell;
    use std::fs;

    /// Directory returning canned GPOs and reports, recording report requests
    struct FakeDirectory {
        gpos: Vec<(GpoReference, Option<&'static str>)>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeDirectory {
        fn new(gpos: Vec<(GpoReference, Option<&'static str>)>) -> Self {
            Self {
                gpos,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl DirectoryService for FakeDirectory {
        fn discover_nearest_controller(&self, _domain: &str) -> AppResult<String> {
            Ok("dc01.contoso.com".to_string())
        }

        fn list_gpos(&self, _ctx: &DirectoryContext) -> AppResult<Vec<GpoReference>> {
            Ok(self.gpos.iter().map(|(g, _)| g.clone()).collect())
        }

        fn get_gpo_report(&self, gpo_id: &str, _ctx: &DirectoryContext) -> AppResult<GpoReport> {
            self.requested.borrow_mut().push(gpo_id.to_string());
            let (_, content) = self
                .gpos
                .iter()
                .find(|(g, _)| g.id == gpo_id)
                .ok_or_else(|| AppError::PowerShell("GPO not found".to_string()))?;
            content
                .map(|c| GpoReport::new(gpo_id, c))
                .ok_or_else(|| AppError::PowerShell("Access is denied".to_string()))
        }
    }

    fn options(folder: &Path, phrases: Option<&str>) -> ExportOptions {
        let mut options = ExportOptions::new(folder);
        options.phrases = phrases.map(|p| split_phrases(Some(p)));
        options
    }

    #[test]
    fn test_reports_requested_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = FakeDirectory::new(vec![
            (GpoReference::new("2", "zeta", GpoStatus::AllSettingsEnabled), Some("<z/>")),
            (GpoReference::new("1", "Alpha", GpoStatus::AllSettingsEnabled), Some("<a/>")),
        ]);

        let summary = export_gpo_reports(&directory, "contoso.com", None, &options(tmp.path(), None)).unwrap();

        assert_eq!(*directory.requested.borrow(), vec!["1", "2"]);
        assert_eq!(summary.server, "dc01.contoso.com");
        assert_eq!(summary.reports_written[0], tmp.path().join("Alpha.xml"));
    }

    #[test]
    fn test_abort_policy_stops_and_writes_no_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = FakeDirectory::new(vec![
            (GpoReference::new("1", "Alpha", GpoStatus::AllSettingsEnabled), None),
            (GpoReference::new("2", "Beta", GpoStatus::AllSettingsEnabled), Some("<b/>")),
        ]);

        let err = export_gpo_reports(&directory, "contoso.com", None, &options(tmp.path(), Some("x")))
            .unwrap_err();

        assert!(matches!(err, AppError::Export { ref gpo_name, .. } if gpo_name == "Alpha"));
        assert_eq!(directory.requested.borrow().len(), 1);
        assert!(!tmp.path().join("GPO_Status.csv").exists());
        assert!(!tmp.path().join("GPO_Settings.csv").exists());
    }

    #[test]
    fn test_continue_policy_records_failure_and_keeps_status() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = FakeDirectory::new(vec![
            (GpoReference::new("1", "Alpha", GpoStatus::AllSettingsEnabled), None),
            (GpoReference::new("2", "Beta", GpoStatus::AllSettingsDisabled), Some("<b>audit</b>")),
        ]);
        let mut opts = options(tmp.path(), Some("audit"));
        opts.failure_policy = FailurePolicy::Continue;

        let summary = export_gpo_reports(&directory, "contoso.com", None, &opts).unwrap();

        assert!(!summary.success());
        assert_eq!(summary.failures[0].gpo_name, "Alpha");
        assert!(summary.failures[0].message.contains("Access is denied"));
        assert_eq!(summary.reports_written.len(), 1);
        assert_eq!(summary.match_count, 1);

        let status = fs::read_to_string(tmp.path().join("GPO_Status.csv")).unwrap();
        assert_eq!(status.lines().count(), 3);
        assert!(!tmp.path().join("Alpha.xml").exists());
    }

    #[test]
    fn test_invalid_regex_fails_before_directory_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = FakeDirectory::new(vec![]);
        let mut opts = options(tmp.path(), Some("(broken"));
        opts.match_mode = crate::domain::MatchMode::Regex;

        let err = export_gpo_reports(&directory, "contoso.com", None, &opts).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(!tmp.path().join("GPO_Status.csv").exists());
    }
}
