use super::Output;
use crate::audit::BlockAudit;
use crate::portfolio::PortfolioSummary;
use crate::types::reason::CatalogEntry;
use crate::types::report::{Finding, ReportHealth};
use crate::verification::VerificationReport;

pub fn to_markdown(output: &Output) -> String {
    match output {
        Output::Audit(audits) => audit_markdown(audits),
        Output::Portfolio(summary) => portfolio_markdown(summary),
        Output::Verify(report) => verification_markdown(report),
        Output::Health(reports) => health_markdown(reports),
        Output::Lint(findings) => lint_markdown(findings),
        Output::Reasons(entries) => reasons_markdown(entries),
    }
}

fn audit_markdown(audits: &[BlockAudit]) -> String {
    let mut output = String::new();
    output.push_str("# Shadow Audit\n\n");
    if audits.is_empty() {
        output.push_str("- no activity blocks\n");
        return output;
    }
    output.push_str("| Block | Report | Activity | KP | Billed h | Shadow h | Inertia % | Value lost | Delay |\n");
    output.push_str("|---|---|---|---|---:|---:|---:|---:|---|\n");
    for audit in audits {
        let summary = &audit.summary;
        output.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {:.1} | {:.2} | {} |\n",
            audit.key,
            audit.report,
            audit.activity_type,
            audit.kp_range,
            summary.total_billed_hours,
            summary.total_shadow_hours,
            summary.inertia_ratio,
            summary.total_value_lost,
            summary.delay_type
        ));
    }
    output
}

fn portfolio_markdown(summary: &PortfolioSummary) -> String {
    let mut output = String::new();
    output.push_str("# Portfolio Efficiency\n\n");
    output.push_str(&format!(
        "- blocks: {} ({} from cache)\n- billed hours: {:.2}\n- shadow hours: {:.2}\n- overall inertia: {:.1}%\n- value lost: {:.2}\n- systemic blocks: {}\n- asset-specific blocks: {}\n\n",
        summary.block_count,
        summary.cached_blocks,
        summary.total_billed_hours,
        summary.total_shadow_hours,
        summary.overall_inertia_ratio,
        summary.total_value_lost,
        summary.systemic_blocks,
        summary.asset_specific_blocks
    ));

    output.push_str("## Value Lost by Responsible Party\n\n");
    let parties = &summary.by_responsible_party;
    output.push_str(&format!(
        "- owner: {:.2}\n- contractor: {:.2}\n- neutral: {:.2}\n- unknown: {:.2}\n- total: {:.2}\n\n",
        parties.owner, parties.contractor, parties.neutral, parties.unknown, parties.total
    ));

    output.push_str("## Systemic Delays by Reason\n\n");
    if summary.by_reason.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for (reason, value) in &summary.by_reason {
            output.push_str(&format!("- {reason}: {value:.2}\n"));
        }
        output.push('\n');
    }

    output.push_str("## Spreads (worst first)\n\n");
    if summary.by_spread.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| Spread | Billed h | Shadow h | Inertia % | Value lost | Systemic | Asset |\n");
        output.push_str("|---|---:|---:|---:|---:|---:|---:|\n");
        for spread in &summary.by_spread {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2} | {:.1} | {:.2} | {} | {} |\n",
                spread.spread,
                spread.billed,
                spread.shadow,
                spread.inertia_ratio,
                spread.value_lost,
                spread.systemic_count,
                spread.asset_count
            ));
        }
        output.push('\n');
    }

    output.push_str("## Daily Trend\n\n");
    if summary.daily_trend.is_empty() {
        output.push_str("- no dated reports\n");
    } else {
        for day in &summary.daily_trend {
            output.push_str(&format!(
                "- {}: inertia {:.1}%, value lost {:.2}\n",
                day.date, day.inertia_ratio, day.value_lost
            ));
        }
    }
    output
}

fn optional_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn verification_markdown(report: &VerificationReport) -> String {
    let mut output = String::new();
    output.push_str("# Efficiency Verification\n\n");
    output.push_str(&format!(
        "Overall reliability: **{}**\n\n",
        report.overall_reliability
    ));
    output.push_str(&format!(
        "- linear metres: {:.2}\n- production ratio: {}\n- quality rate: {}\n- average productivity drag penalty: {:.1}\n- value lost: {:.2}\n- rework cost: {:.2}\n- true cost of completion: {:.2}\n- unreliable blocks: {}\n- questionable blocks: {}\n\n",
        report.total_linear_metres,
        optional_percent(report.overall_production_ratio),
        optional_percent(report.overall_quality_rate),
        report.avg_productivity_drag_penalty,
        report.total_value_lost,
        report.total_rework_cost,
        report.true_cost_of_completion,
        report.unreliable_blocks,
        report.questionable_blocks
    ));

    output.push_str("## Critical Alerts\n\n");
    if report.critical_alerts.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for alert in &report.critical_alerts {
            output.push_str(&format!("- {alert}\n"));
        }
        output.push('\n');
    }

    output.push_str("## Blocks\n\n");
    for block in &report.blocks {
        output.push_str(&format!(
            "- {} [{}]: inertia {:.1}%, production {}, quality {}\n",
            block.block,
            block.reliability,
            block.inertia_ratio,
            optional_percent(block.production_ratio),
            optional_percent(block.quality_rate)
        ));
    }
    output
}

fn health_markdown(reports: &[ReportHealth]) -> String {
    let mut output = String::new();
    output.push_str("# Report Health\n\n");
    for entry in reports {
        let health = &entry.health;
        output.push_str(&format!(
            "## {}\n\nScore: {:.2} / threshold {:.2} ({})\n\n",
            entry.report,
            health.score,
            health.threshold,
            if health.passing { "passing" } else { "below threshold" }
        ));
        for (kind, category) in health.details.categories() {
            output.push_str(&format!(
                "- {}: {:.1} (weight {:.0})\n",
                kind.label(),
                category.score,
                category.weight
            ));
            for issue in &category.issues {
                output.push_str(&format!("  - {issue}\n"));
            }
        }
        output.push('\n');
    }
    output
}

fn lint_markdown(findings: &[Finding]) -> String {
    let mut output = String::new();
    output.push_str("# Delay Documentation\n\n");
    if findings.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    for finding in findings {
        output.push_str(&format!(
            "- [{}] {}: {}",
            if finding.blocking {
                "blocking"
            } else {
                "warning"
            },
            finding.title,
            finding.body
        ));
        if let Some(location) = &finding.location {
            output.push_str(&format!(" ({location})"));
        }
        output.push('\n');
    }
    output
}

fn reasons_markdown(entries: &[CatalogEntry]) -> String {
    let mut output = String::new();
    output.push_str("# Delay Reasons\n\n");
    output.push_str("| Key | Label | Party | Systemic by default | Locked | Note required |\n");
    output.push_str("|---|---|---|---|---|---|\n");
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    for entry in entries {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            entry.key,
            entry.label,
            entry.traits.responsible_party,
            yes_no(entry.traits.default_systemic),
            yes_no(entry.traits.lock_systemic),
            yes_no(entry.traits.requires_note)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::cache::SummaryCache;
    use crate::audit::rates::RateLookup;
    use crate::portfolio::aggregate;
    use crate::types::reason::catalog;

    #[test]
    fn reasons_table_lists_every_key() {
        let rendered = to_markdown(&Output::Reasons(catalog()));
        assert!(rendered.starts_with("# Delay Reasons"));
        assert!(rendered.contains("| extreme_weather | Extreme weather | neutral | yes | yes | no |"));
        assert!(rendered.contains("| rework |"));
    }

    #[test]
    fn empty_portfolio_renders_placeholders() {
        let summary = aggregate(&[], &SummaryCache::new(), &RateLookup::default());
        let rendered = to_markdown(&Output::Portfolio(summary));
        assert!(rendered.contains("# Portfolio Efficiency"));
        assert!(rendered.contains("## Systemic Delays by Reason\n\n- none"));
        assert!(rendered.contains("- no dated reports"));
    }

    #[test]
    fn lint_lines_are_tagged_by_severity() {
        let findings = vec![Finding {
            id: "delay.note_required".to_string(),
            title: "Delay reason needs a note".to_string(),
            body: "note missing".to_string(),
            blocking: true,
            location: Some("R-1".to_string()),
        }];
        let rendered = to_markdown(&Output::Lint(findings));
        assert!(rendered.contains("- [blocking] Delay reason needs a note: note missing (R-1)"));
    }
}
