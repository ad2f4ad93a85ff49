//! Weighted completeness score for a single daily report.
//!
//! The score is advisory: it warns before submission but never blocks it,
//! and no input shape makes it fail.

pub mod chainage;
pub mod directive050;
pub mod documentation;
pub mod fields;
pub mod mentor;
pub mod photos;

use crate::audit::block::round2;
use crate::types::config::AuditConfig;
use crate::types::daily::DailyReport;
use crate::types::scoring::{HealthDetails, HealthScore};

/// Threshold precedence: explicit override, then the report's contract
/// setting, then configuration.
pub fn resolve_threshold(
    override_threshold: Option<f64>,
    report: &DailyReport,
    config: &AuditConfig,
) -> f64 {
    override_threshold
        .or(report.health_threshold)
        .unwrap_or_else(|| config.health_threshold())
}

pub fn score_report(report: &DailyReport, weights: &[f64; 6], threshold: f64) -> HealthScore {
    let blocks = &report.blocks;
    let details = HealthDetails {
        photo_completeness: photos::photo_completeness(blocks, weights[0]),
        directive_050: directive050::directive_050(blocks, weights[1]),
        field_completeness: fields::field_completeness(blocks, weights[2]),
        chainage_integrity: chainage::chainage_integrity(blocks, weights[3]),
        labour_equipment: documentation::labour_equipment(blocks, weights[4]),
        mentor_alerts: mentor::mentor_alerts(&report.mentor_alerts, weights[5]),
    };

    let (weighted, total_weight) = details
        .categories()
        .iter()
        .fold((0.0, 0.0), |(weighted, total), (_, category)| {
            (
                weighted + category.score * category.weight,
                total + category.weight,
            )
        });
    let score = if total_weight > 0.0 {
        round2((weighted / total_weight).clamp(0.0, 100.0))
    } else {
        100.0
    };

    tracing::debug!(report = %report.label(), score, threshold, "scored report health");

    HealthScore {
        score,
        details,
        passing: score >= threshold,
        threshold,
    }
}
