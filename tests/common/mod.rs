use gpo_export::{AppError, AppResult, DirectoryContext, DirectoryService, GpoReference, GpoReport, GpoStatus};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory domain: GPOs with optional report text (None fails the export)
pub struct FakeDomain {
    gpos: Vec<GpoReference>,
    reports: HashMap<String, Option<String>>,
    pub report_requests: RefCell<Vec<String>>,
    pub contexts: RefCell<Vec<DirectoryContext>>,
}

impl FakeDomain {
    pub fn new() -> Self {
        Self {
            gpos: Vec::new(),
            reports: HashMap::new(),
            report_requests: RefCell::new(Vec::new()),
            contexts: RefCell::new(Vec::new()),
        }
    }

    pub fn with_gpo(mut self, id: &str, name: &str, status: GpoStatus, report: &str) -> Self {
        self.gpos.push(GpoReference::new(id, name, status));
        self.reports.insert(id.to_string(), Some(report.to_string()));
        self
    }

    pub fn with_broken_gpo(mut self, id: &str, name: &str, status: GpoStatus) -> Self {
        self.gpos.push(GpoReference::new(id, name, status));
        self.reports.insert(id.to_string(), None);
        self
    }
}

impl DirectoryService for FakeDomain {
    fn discover_nearest_controller(&self, domain: &str) -> AppResult<String> {
        Ok(format!("dc01.{}", domain))
    }

    fn list_gpos(&self, ctx: &DirectoryContext) -> AppResult<Vec<GpoReference>> {
        self.contexts.borrow_mut().push(ctx.clone());
        Ok(self.gpos.clone())
    }

    fn get_gpo_report(&self, gpo_id: &str, ctx: &DirectoryContext) -> AppResult<GpoReport> {
        self.contexts.borrow_mut().push(ctx.clone());
        self.report_requests.borrow_mut().push(gpo_id.to_string());
        match self.reports.get(gpo_id) {
            Some(Some(content)) => Ok(GpoReport::new(gpo_id, content.clone())),
            Some(None) => Err(AppError::PowerShell(
                "Get-GPOReport : Access is denied. (Exception from HRESULT: 0x80070005)".to_string(),
            )),
            None => Err(AppError::PowerShell(format!("GPO {} not found", gpo_id))),
        }
    }
}

/// Directory whose enumeration always fails
pub struct UnreachableDomain;

impl DirectoryService for UnreachableDomain {
    fn discover_nearest_controller(&self, domain: &str) -> AppResult<String> {
        Ok(format!("dc01.{}", domain))
    }

    fn list_gpos(&self, _ctx: &DirectoryContext) -> AppResult<Vec<GpoReference>> {
        Err(AppError::PowerShell("The server is not operational".to_string()))
    }

    fn get_gpo_report(&self, gpo_id: &str, _ctx: &DirectoryContext) -> AppResult<GpoReport> {
        Ok(GpoReport::new(gpo_id, ""))
    }
}
