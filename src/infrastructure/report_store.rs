//! Report files on disk
//!
//! One `<DisplayName>.xml` per GPO. Names are made safe for Windows file
//! systems, and GPOs whose names collide get their id appended.
//!
//! Reports are stored as UTF-8 without a byte-order mark. The GroupPolicy
//! module declares `encoding="utf-16"` in the XML header of every report it
//! returns, so that declaration is rewritten to `utf-8` to match the bytes
//! on disk.

use crate::domain::{GpoReference, GpoReport};
use crate::error::AppResult;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const REPORT_EXTENSION: &str = "xml";

/// Names Windows reserves for devices, with or without an extension
const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

static UTF16_DECLARATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)\A(\s*<\?xml[^>]*?\bencoding\s*=\s*["'])utf-16(?:le|be)?(["'])"#).ok()
});

/// Create the report folder and any missing parents
pub fn ensure_report_folder(folder: &Path) -> AppResult<()> {
    if !folder.exists() {
        tracing::info!(folder = %folder.display(), "Creating report folder");
    }
    fs::create_dir_all(folder)?;
    Ok(())
}

/// Replace characters Windows does not allow in file names and suffix
/// reserved device names with `_`
pub fn sanitize_file_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let mut stem = replaced.trim_end_matches(&['.', ' '][..]).to_string();
    if let Some(end) = reserved_device_prefix(&stem) {
        stem.insert(end, '_');
    }
    stem
}

/// End of a reserved device name at the start of `stem`. `NUL` and
/// `nul.txt` both open the device, so only the part before the first dot
/// counts.
fn reserved_device_prefix(stem: &str) -> Option<usize> {
    let base = stem.split('.').next().unwrap_or_default().trim_end();
    RESERVED_DEVICE_NAMES
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
        .then_some(base.len())
}

/// Report path for every GPO, in the same order as `gpos`.
///
/// Stems shared by more than one GPO (compared case-insensitively) become
/// `<stem> {<id>}` for all of them.
pub fn plan_report_paths(folder: &Path, gpos: &[GpoReference]) -> Vec<PathBuf> {
    let stems: Vec<String> = gpos
        .iter()
        .map(|gpo| {
            let stem = sanitize_file_stem(&gpo.display_name);
            if stem.is_empty() {
                sanitize_file_stem(&gpo.id)
            } else {
                stem
            }
        })
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.to_lowercase()).or_default() += 1;
    }

    gpos.iter()
        .zip(stems)
        .map(|(gpo, stem)| {
            let file_stem = if counts[&stem.to_lowercase()] > 1 {
                tracing::warn!(
                    gpo = %gpo.display_name,
                    id = %gpo.id,
                    "Display name shared by several GPOs, adding id to report file name"
                );
                format!("{} {{{}}}", stem, sanitize_file_stem(&gpo.id))
            } else {
                stem
            };
            folder.join(format!("{}.{}", file_stem, REPORT_EXTENSION))
        })
        .collect()
}

/// Write a report as UTF-8, replacing any previous file
pub fn write_report(path: &Path, report: &GpoReport) -> AppResult<()> {
    fs::write(path, declare_utf8(&report.content).as_bytes())?;
    Ok(())
}

/// Drop a leading byte-order mark and point a UTF-16 XML declaration at UTF-8
fn declare_utf8(content: &str) -> Cow<'_, str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    match UTF16_DECLARATION.as_ref() {
        Some(re) => re.replace(content, "${1}utf-8${2}"),
        None => Cow::Borrowed(content),
    }
}
