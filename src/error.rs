use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No domain controller found for {domain}: {message}")]
    Discovery { domain: String, message: String },

    #[error("Failed to list GPOs in {domain}: {message}")]
    Enumeration { domain: String, message: String },

    #[error("Failed to export report for GPO '{gpo_name}' ({gpo_id}): {message}")]
    Export {
        gpo_name: String,
        gpo_id: String,
        message: String,
    },

    #[error("PowerShell error: {0}")]
    PowerShell(String),

    #[error("Windows API error: {0}")]
    WindowsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0} GPO report(s) could not be exported")]
    ExportIncomplete(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Discovery { .. } => "DISCOVERY_FAILED",
            AppError::Enumeration { .. } => "ENUMERATION_FAILED",
            AppError::Export { .. } => "EXPORT_FAILED",
            AppError::PowerShell(_) => "POWERSHELL_ERROR",
            AppError::WindowsError(_) => "WINDOWS_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::ExportIncomplete(_) => "EXPORT_INCOMPLETE",
            AppError::IoError(_) => "IO_ERROR",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::ConfigError(_) => 2,
            AppError::ExportIncomplete(_) => 3,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
