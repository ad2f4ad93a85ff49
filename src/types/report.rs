use super::scoring::HealthScore;
use serde::Serialize;

/// A documentation problem found in a daily report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub body: String,
    pub blocking: bool,
    /// Report and block the finding points at, e.g. `R-100 (2026-03-14) / Welding (KP 1+000-1+400)`.
    pub location: Option<String>,
}

/// Health score of one report, labelled for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHealth {
    pub report: String,
    pub health: HealthScore,
}
