pub mod block;
pub mod cache;
pub mod entry;
pub mod rates;
pub mod status;

use crate::types::block::ActivityBlock;
use crate::types::daily::DailyReport;
use crate::types::summary::ShadowAuditSummary;
use cache::{BlockKey, SummaryCache};
use rates::RateLookup;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAudit {
    pub key: String,
    pub report: String,
    pub activity_type: String,
    pub kp_range: String,
    pub summary: ShadowAuditSummary,
    /// Taken from a stored summary rather than recomputed.
    pub cached: bool,
}

/// The cached summary when it is still valid for `block`, else a fresh one.
pub fn summary_for(
    report: &DailyReport,
    index: usize,
    block: &ActivityBlock,
    cache: &SummaryCache,
    rates: &RateLookup,
) -> (ShadowAuditSummary, bool) {
    let key = BlockKey::for_block(report, index, block);
    match cache.get(&key, block) {
        Some(summary) => (summary.clone(), true),
        None => (block::audit_block(block, rates), false),
    }
}

/// Per-block summaries for every block of every report, in input order.
pub fn audit_reports(
    reports: &[DailyReport],
    cache: &SummaryCache,
    rates: &RateLookup,
) -> Vec<BlockAudit> {
    reports
        .iter()
        .flat_map(|report| {
            report
                .blocks
                .iter()
                .enumerate()
                .map(move |(index, block)| {
                    let (summary, cached) = summary_for(report, index, block, cache, rates);
                    BlockAudit {
                        key: BlockKey::for_block(report, index, block).to_string(),
                        report: report.label(),
                        activity_type: block.activity_type.label().to_string(),
                        kp_range: block.kp_range(),
                        summary,
                        cached,
                    }
                })
        })
        .collect()
}
