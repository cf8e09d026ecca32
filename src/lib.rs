pub mod cli;
pub mod commands;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use commands::export_gpo_reports;
pub use domain::{DirectoryContext, ExportOptions, ExportSummary, GpoReference, GpoReport, GpoStatus};
pub use error::{AppError, AppResult};
pub use infrastructure::{DirectoryService, WindowsDirectory};
