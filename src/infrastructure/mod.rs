pub mod dc_locator;
pub mod directory;
pub mod powershell;
pub mod report_store;
pub mod summary_tables;

pub use directory::*;
pub use report_store::*;
pub use summary_tables::*;
