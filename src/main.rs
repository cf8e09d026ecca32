use clap::Parser;
use gpo_export::cli::Cli;
use gpo_export::{export_gpo_reports, AppError, ExportSummary, WindowsDirectory};
use std::process::ExitCode;

fn print_summary(summary: &ExportSummary) {
    println!(
        "Exported {} of {} GPO reports from {} ({})",
        summary.reports_written.len(),
        summary.gpo_count,
        summary.domain,
        summary.server
    );
    if let Some(path) = &summary.status_table {
        println!("Status table:   {}", path.display());
    }
    if let Some(path) = &summary.settings_table {
        println!("Settings table: {} ({} matches)", path.display(), summary.match_count);
    }
    for failure in &summary.failures {
        println!("Failed: {} ({}): {}", failure.gpo_name, failure.gpo_id, failure.message);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let options = cli.export_options();
    let summary = export_gpo_reports(
        &WindowsDirectory,
        &cli.domain_name,
        cli.server.as_deref(),
        &options,
    )?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if summary.success() {
        Ok(())
    } else {
        Err(AppError::ExportIncomplete(summary.failures.len()))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = gpo_export::logging::init_logging(cli.log_dir.as_deref());

    tracing::info!(domain = %cli.domain_name, "gpo-export starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
