//! PowerShell script execution
//!
//! GroupPolicy cmdlets have no native API equivalent, so GPO enumeration and
//! report export run as short scripts whose stdout is captured.

use crate::error::{AppError, AppResult};
use std::process::Command;

#[cfg(windows)]
const POWERSHELL: &str = "powershell";
#[cfg(not(windows))]
const POWERSHELL: &str = "pwsh";

/// Quote a value as a single-quoted PowerShell string literal
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Run a script and return its stdout.
///
/// A nonzero exit status becomes `AppError::PowerShell` carrying stderr.
pub fn run_powershell(script: &str) -> AppResult<String> {
    tracing::debug!(program = POWERSHELL, script_len = script.len(), "Running PowerShell script");

    let output = Command::new(POWERSHELL)
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            script,
        ])
        .output()
        .map_err(|e| AppError::PowerShell(format!("Failed to execute {}: {}", POWERSHELL, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            format!("{} exited with {}", POWERSHELL, output.status)
        } else {
            stderr.to_string()
        };
        return Err(AppError::PowerShell(message));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `-Server` argument when a server is known
fn server_arg(server: Option<&str>) -> String {
    server
        .map(|s| format!(" -Server {}", ps_quote(s)))
        .unwrap_or_default()
}

/// Script listing every GPO in a domain as a compact JSON array
pub fn list_gpos_script(domain: &str, server: Option<&str>) -> String {
    format!(
        r#"
        $ErrorActionPreference = 'Stop'
        [Console]::OutputEncoding = [System.Text.Encoding]::UTF8
        Import-Module GroupPolicy -ErrorAction Stop

        $gpos = @(Get-GPO -All -Domain {domain}{server} | Sort-Object DisplayName | ForEach-Object {{
            [pscustomobject]@{{
                id = $_.Id.ToString()
                displayName = $_.DisplayName
                status = $_.GpoStatus.ToString()
            }}
        }})

        ConvertTo-Json -InputObject $gpos -Compress -Depth 2
        "#,
        domain = ps_quote(domain),
        server = server_arg(server),
    )
}

/// Script writing one GPO's XML report to stdout
pub fn gpo_report_script(gpo_id: &str, domain: &str, server: Option<&str>) -> String {
    format!(
        r#"
        $ErrorActionPreference = 'Stop'
        [Console]::OutputEncoding = [System.Text.Encoding]::UTF8
        Import-Module GroupPolicy -ErrorAction Stop

        Get-GPOReport -Guid {gpo_id} -ReportType Xml -Domain {domain}{server}
        "#,
        gpo_id = ps_quote(gpo_id),
        domain = ps_quote(domain),
        server = server_arg(server),
    )
}
