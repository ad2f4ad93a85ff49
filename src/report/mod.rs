pub mod json;
pub mod md;

use crate::audit::BlockAudit;
use crate::error::{AuditError, Result};
use crate::portfolio::PortfolioSummary;
use crate::types::reason::CatalogEntry;
use crate::types::report::{Finding, ReportHealth};
use crate::verification::VerificationReport;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Result of one command, ready to render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", content = "result", rename_all = "lowercase")]
pub enum Output {
    Audit(Vec<BlockAudit>),
    Portfolio(PortfolioSummary),
    Verify(VerificationReport),
    Health(Vec<ReportHealth>),
    Lint(Vec<Finding>),
    Reasons(Vec<CatalogEntry>),
}

pub fn render(output: &Output, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(output).map_err(AuditError::Json),
        OutputFormat::Md => Ok(md::to_markdown(output)),
    }
}
