//! Summary tables
//!
//! GPO_Status.csv and GPO_Settings.csv are written in the shape
//! `Export-Csv -NoTypeInformation` produces: every field double-quoted,
//! CRLF line endings, header only when the file starts out empty.

use crate::domain::{MatchRecord, StatusRecord, TableMode};
use crate::error::AppResult;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const STATUS_TABLE: &str = "GPO_Status.csv";
pub const SETTINGS_TABLE: &str = "GPO_Settings.csv";

const STATUS_HEADER: [&str; 2] = ["GPO Name", "GPO Status"];
const SETTINGS_HEADER: [&str; 2] = ["GroupPolicyName", "Setting"];
const LINE_ENDING: &str = "\r\n";

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn format_row(fields: &[&str]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    format!("{}{}", quoted.join(","), LINE_ENDING)
}

/// Write rows to `path`, adding the header when the file is new or empty
fn write_table<'a>(
    path: &Path,
    header: &[&str],
    rows: impl Iterator<Item = [&'a str; 2]>,
    mode: TableMode,
) -> AppResult<usize> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        TableMode::Append => options.append(true),
        TableMode::Truncate => options.write(true).truncate(true),
    };

    let file = options.open(path)?;
    let needs_header = file.metadata()?.len() == 0;
    let mut writer = BufWriter::new(file);

    if needs_header {
        writer.write_all(format_row(header).as_bytes())?;
    }

    let mut written = 0;
    for row in rows {
        writer.write_all(format_row(&row).as_bytes())?;
        written += 1;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = written, ?mode, "Wrote summary table");
    Ok(written)
}

/// Write status records to GPO_Status.csv inside `folder`
pub fn write_status_table(folder: &Path, records: &[StatusRecord], mode: TableMode) -> AppResult<PathBuf> {
    let path = folder.join(STATUS_TABLE);
    let statuses: Vec<String> = records.iter().map(|r| r.status.to_string()).collect();
    let rows = records
        .iter()
        .zip(&statuses)
        .map(|(r, status)| [r.gpo_name.as_str(), status.as_str()]);
    write_table(&path, &STATUS_HEADER, rows, mode)?;
    Ok(path)
}

/// Write match records to GPO_Settings.csv inside `folder`
pub fn write_settings_table(folder: &Path, records: &[MatchRecord], mode: TableMode) -> AppResult<PathBuf> {
    let path = folder.join(SETTINGS_TABLE);
    let rows = records
        .iter()
        .map(|r| [r.gpo_name.as_str(), r.setting.as_str()]);
    write_table(&path, &SETTINGS_HEADER, rows, mode)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GpoStatus;
    use std::fs;

    fn status(name: &str, status: GpoStatus) -> StatusRecord {
        StatusRecord {
            gpo_name: name.to_string(),
            status,
        }
    }

    #[test]
    fn test_quote_field_doubles_quotes() {
        assert_eq!(quote_field(r#"Say "hi""#), r#""Say ""hi""""#);
        assert_eq!(quote_field(""), r#""""#);
    }

    #[test]
    fn test_status_table_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![
            status("Alpha", GpoStatus::AllSettingsEnabled),
            status("Beta", GpoStatus::AllSettingsDisabled),
        ];
        let path = write_status_table(tmp.path(), &records, TableMode::Append).unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "\"GPO Name\",\"GPO Status\"\r\n\
             \"Alpha\",\"AllSettingsEnabled\"\r\n\
             \"Beta\",\"AllSettingsDisabled\"\r\n"
        );
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_settings_table(tmp.path(), &[], TableMode::Append).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "\"GroupPolicyName\",\"Setting\"\r\n");
    }

    #[test]
    fn test_append_keeps_rows_and_single_header() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![MatchRecord {
            gpo_name: "Alpha".to_string(),
            setting: "password policy".to_string(),
        }];
        write_settings_table(tmp.path(), &records, TableMode::Append).unwrap();
        let path = write_settings_table(tmp.path(), &records, TableMode::Append).unwrap();

        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.matches("GroupPolicyName").count(), 1);
    }

    #[test]
    fn test_truncate_replaces_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![status("Alpha", GpoStatus::UserSettingsDisabled)];
        write_status_table(tmp.path(), &records, TableMode::Append).unwrap();
        write_status_table(tmp.path(), &records, TableMode::Append).unwrap();
        let path = write_status_table(tmp.path(), &records, TableMode::Truncate).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 2);
    }
}
