//! Delay documentation checks run before a report is submitted.

use crate::audit::block::time_entries;
use crate::audit::status::is_systemic_by_default;
use crate::health;
use crate::types::block::ActivityBlock;
use crate::types::daily::DailyReport;
use crate::types::reason::DelayReason;
use crate::types::report::Finding;

fn finding(id: &str, title: &str, body: String, blocking: bool, location: String) -> Finding {
    Finding {
        id: id.to_string(),
        title: title.to_string(),
        body,
        blocking,
        location: Some(location),
    }
}

fn lint_block(report: &DailyReport, block: &ActivityBlock, findings: &mut Vec<Finding>) {
    let location = format!("{} / {}", report.label(), block.describe());
    let block_wide = block.overriding_delay().is_some();

    for entry in time_entries(block).filter(|entry| entry.status().is_delay()) {
        let Some(key) = entry.delay_reason() else {
            findings.push(finding(
                "delay.missing_reason",
                "Delay without a reason",
                format!("{} is {} with no delay reason selected", entry.describe(), entry.status()),
                false,
                location.clone(),
            ));
            continue;
        };
        let Some(reason) = DelayReason::from_key(key) else {
            findings.push(finding(
                "delay.unknown_reason",
                "Unrecognized delay reason",
                format!("{}: '{key}' is not in the delay reason catalog", entry.describe()),
                false,
                location.clone(),
            ));
            continue;
        };

        let traits = reason.traits();
        let has_note = entry.delay_note().is_some_and(|note| !note.trim().is_empty());
        if traits.requires_note && !has_note {
            findings.push(finding(
                "delay.note_required",
                "Delay reason needs a note",
                format!("{}: '{}' requires a delay note", entry.describe(), reason.label()),
                true,
                location.clone(),
            ));
        }
        if traits.lock_systemic && !block_wide {
            findings.push(finding(
                "delay.systemic_locked",
                "Reason must be recorded block-wide",
                format!(
                    "{}: '{}' applies to the whole block; record it as a systemic delay",
                    entry.describe(),
                    reason.label()
                ),
                true,
                location.clone(),
            ));
        } else if !block_wide && is_systemic_by_default(key) {
            findings.push(finding(
                "delay.systemic_suggested",
                "Reason is usually block-wide",
                format!(
                    "{}: '{}' normally affects the whole crew; consider a systemic delay",
                    entry.describe(),
                    reason.label()
                ),
                false,
                location.clone(),
            ));
        }
    }

    if let Some(delay) = block.overriding_delay() {
        match delay.reason.as_deref() {
            None => findings.push(finding(
                "systemic.missing_reason",
                "Systemic delay without a reason",
                format!("block-wide {} has no delay reason selected", delay.status),
                false,
                location,
            )),
            Some(key) => {
                let reason = DelayReason::from_key(key);
                let has_note = delay.note.as_deref().is_some_and(|note| !note.trim().is_empty());
                if reason.is_none() {
                    findings.push(finding(
                        "systemic.unknown_reason",
                        "Unrecognized delay reason",
                        format!("block-wide delay reason '{key}' is not in the catalog"),
                        false,
                        location,
                    ));
                } else if reason.is_some_and(|reason| reason.traits().requires_note) && !has_note {
                    findings.push(finding(
                        "systemic.note_required",
                        "Delay reason needs a note",
                        format!("block-wide delay reason '{key}' requires a note"),
                        true,
                        location,
                    ));
                }
            }
        }
    }
}

/// Documentation findings for one report. A failing health score is a
/// warning, never a blocker.
pub fn lint_report(report: &DailyReport, weights: &[f64; 6], threshold: f64) -> Vec<Finding> {
    let mut findings = Vec::new();
    for block in &report.blocks {
        lint_block(report, block, &mut findings);
    }

    let health = health::score_report(report, weights, threshold);
    if !health.passing {
        findings.push(Finding {
            id: "health.below_threshold".to_string(),
            title: "Report health below threshold".to_string(),
            body: format!(
                "health score {:.2} is below the threshold of {:.2}",
                health.score, health.threshold
            ),
            blocking: false,
            location: Some(report.label()),
        });
    }

    tracing::debug!(
        report = %report.label(),
        findings = findings.len(),
        "linted report"
    );
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::block::{LabourEntry, ProductionStatus, SystemicDelay};
    use crate::types::config::AuditConfig;

    fn delayed(reason: Option<&str>, note: Option<&str>) -> LabourEntry {
        LabourEntry {
            classification: "Labourer".to_string(),
            rt: 8.0,
            production_status: ProductionStatus::SyncDelay,
            delay_reason: reason.map(str::to_string),
            delay_note: note.map(str::to_string),
            ..LabourEntry::default()
        }
    }

    fn report(blocks: Vec<ActivityBlock>) -> DailyReport {
        DailyReport {
            id: Some("R-7".to_string()),
            blocks,
            ..DailyReport::default()
        }
    }

    fn lint(report: &DailyReport) -> Vec<Finding> {
        lint_report(report, &AuditConfig::default_weights(), 0.0)
    }

    fn ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|finding| finding.id.as_str()).collect()
    }

    #[test]
    fn rework_without_note_is_blocking() {
        let block = ActivityBlock {
            labour_entries: vec![delayed(Some("rework"), None)],
            ..ActivityBlock::default()
        };
        let findings = lint(&report(vec![block]));
        assert_eq!(ids(&findings), vec!["delay.note_required"]);
        assert!(findings[0].blocking);
        assert!(findings[0]
            .location
            .as_deref()
            .is_some_and(|location| location.starts_with("R-7")));
    }

    #[test]
    fn locked_reason_on_entry_is_blocking_until_recorded_block_wide() {
        let block = ActivityBlock {
            labour_entries: vec![delayed(Some("extreme_weather"), None)],
            ..ActivityBlock::default()
        };
        let findings = lint(&report(vec![block.clone()]));
        assert_eq!(ids(&findings), vec!["delay.systemic_locked"]);
        assert!(findings[0].blocking);

        let recorded = ActivityBlock {
            systemic_delay: Some(SystemicDelay {
                active: true,
                status: ProductionStatus::ManagementDrag,
                reason: Some("extreme_weather".to_string()),
                note: None,
            }),
            ..block
        };
        assert!(lint(&report(vec![recorded])).is_empty());
    }

    #[test]
    fn missing_and_unknown_reasons_are_warnings() {
        let block = ActivityBlock {
            labour_entries: vec![delayed(None, None), delayed(Some("lunch"), None)],
            systemic_delay: None,
            ..ActivityBlock::default()
        };
        let findings = lint(&report(vec![block]));
        assert_eq!(
            ids(&findings),
            vec!["delay.missing_reason", "delay.unknown_reason"]
        );
        assert!(findings.iter().all(|finding| !finding.blocking));
    }

    #[test]
    fn active_entries_are_not_checked() {
        let mut entry = delayed(Some("rework"), None);
        entry.production_status = ProductionStatus::Active;
        let block = ActivityBlock {
            labour_entries: vec![entry],
            ..ActivityBlock::default()
        };
        assert!(lint(&report(vec![block])).is_empty());
    }

    #[test]
    fn systemic_delay_without_reason_warns() {
        let block = ActivityBlock {
            systemic_delay: Some(SystemicDelay {
                active: true,
                status: ProductionStatus::SyncDelay,
                reason: None,
                note: None,
            }),
            ..ActivityBlock::default()
        };
        let findings = lint(&report(vec![block]));
        assert_eq!(ids(&findings), vec!["systemic.missing_reason"]);
        assert!(!findings[0].blocking);
    }

    #[test]
    fn failing_health_is_a_warning() {
        let block = ActivityBlock {
            activity_type: crate::types::activity::ActivityType::LowerIn,
            ..ActivityBlock::default()
        };
        let findings = lint_report(&report(vec![block]), &AuditConfig::default_weights(), 100.0);
        assert_eq!(ids(&findings), vec!["health.below_threshold"]);
        assert!(!findings[0].blocking);
    }
}
