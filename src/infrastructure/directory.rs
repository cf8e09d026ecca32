//! Directory queries used by the export
//!
//! `DirectoryService` is the seam between the export pipeline and the
//! domain. `WindowsDirectory` answers it with the DC locator and the
//! GroupPolicy PowerShell module.

use super::dc_locator;
use super::powershell::{gpo_report_script, list_gpos_script, run_powershell};
use crate::domain::{DirectoryContext, GpoReference, GpoReport, GpoStatus};
use crate::error::{AppError, AppResult};
use serde::Deserialize;

pub trait DirectoryService {
    /// Find a directory controller near the caller for `domain`
    fn discover_nearest_controller(&self, domain: &str) -> AppResult<String>;

    /// List every GPO in the context's domain
    fn list_gpos(&self, ctx: &DirectoryContext) -> AppResult<Vec<GpoReference>>;

    /// Fetch the XML report of one GPO
    fn get_gpo_report(&self, gpo_id: &str, ctx: &DirectoryContext) -> AppResult<GpoReport>;
}

/// Directory access through Windows APIs and PowerShell
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsDirectory;

impl DirectoryService for WindowsDirectory {
    fn discover_nearest_controller(&self, domain: &str) -> AppResult<String> {
        dc_locator::discover_nearest_controller(domain)
    }

    fn list_gpos(&self, ctx: &DirectoryContext) -> AppResult<Vec<GpoReference>> {
        let script = list_gpos_script(&ctx.domain, ctx.server.as_deref());
        let stdout = run_powershell(&script)?;
        parse_gpo_list(&stdout)
    }

    fn get_gpo_report(&self, gpo_id: &str, ctx: &DirectoryContext) -> AppResult<GpoReport> {
        let script = gpo_report_script(gpo_id, &ctx.domain, ctx.server.as_deref());
        let stdout = run_powershell(&script)?;
        Ok(GpoReport::new(gpo_id, strip_trailing_newline(&stdout)))
    }
}

/// One entry of the listing script's JSON array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedGpo {
    id: String,
    display_name: String,
    status: String,
}

/// Parse the JSON emitted by the GPO listing script, in the order listed
pub fn parse_gpo_list(stdout: &str) -> AppResult<Vec<GpoReference>> {
    let trimmed = stdout.trim().trim_start_matches('\u{feff}');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let listed: Vec<ListedGpo> = serde_json::from_str(trimmed)?;
    listed
        .into_iter()
        .map(|gpo| {
            let status = gpo.status.parse::<GpoStatus>().map_err(|e| {
                AppError::PowerShell(format!("{} for GPO '{}'", e, gpo.display_name))
            })?;
            Ok(GpoReference::new(gpo.id, gpo.display_name, status))
        })
        .collect()
}

/// Host output ends with one line terminator the report itself does not have
fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

/// Resolve the server for a run: an explicit server wins, otherwise discover one
pub fn resolve_context(
    directory: &dyn DirectoryService,
    domain: &str,
    server: Option<&str>,
) -> AppResult<DirectoryContext> {
    if domain.trim().is_empty() {
        return Err(AppError::ConfigError("Domain name must not be empty".to_string()));
    }

    let server = match server {
        Some(server) => {
            tracing::info!(domain, server, "Using configured domain controller");
            server.to_string()
        }
        None => {
            let server = directory.discover_nearest_controller(domain).map_err(|e| match e {
                e @ AppError::Discovery { .. } => e,
                other => AppError::Discovery {
                    domain: domain.to_string(),
                    message: other.to_string(),
                },
            })?;
            tracing::info!(domain, server = %server, "Discovered domain controller");
            server
        }
    };

    Ok(DirectoryContext::new(domain).with_server(server))
}
