//! Roll-up of block summaries across reports, spreads and dates.

use crate::audit::block::{inertia_ratio, round1, round2, selected_delay_reason};
use crate::audit::cache::SummaryCache;
use crate::audit::rates::RateLookup;
use crate::audit::summary_for;
use crate::types::block::ActivityBlock;
use crate::types::daily::DailyReport;
use crate::types::reason::{responsible_party_for, DelayReason, ResponsibleParty};
use crate::types::summary::{DelayType, ShadowAuditSummary};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNKNOWN_SPREAD: &str = "Unknown";
pub const UNSPECIFIED_REASON: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadMetrics {
    pub spread: String,
    pub billed: f64,
    pub shadow: f64,
    pub value_lost: f64,
    pub systemic_count: usize,
    pub asset_count: usize,
    pub inertia_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub billed: f64,
    pub shadow: f64,
    pub value_lost: f64,
    pub inertia_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartyBreakdown {
    pub owner: f64,
    pub contractor: f64,
    pub neutral: f64,
    pub unknown: f64,
    pub total: f64,
}

impl PartyBreakdown {
    fn add(&mut self, party: ResponsibleParty, value: f64) {
        let slot = match party {
            ResponsibleParty::Owner => &mut self.owner,
            ResponsibleParty::Contractor => &mut self.contractor,
            ResponsibleParty::Neutral => &mut self.neutral,
            ResponsibleParty::Unknown => &mut self.unknown,
        };
        *slot += value;
        self.total += value;
    }

    fn rounded(&self) -> Self {
        Self {
            owner: round2(self.owner),
            contractor: round2(self.contractor),
            neutral: round2(self.neutral),
            unknown: round2(self.unknown),
            total: round2(self.total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub block_count: usize,
    /// Blocks whose summary came from the cache rather than recomputation.
    pub cached_blocks: usize,
    pub total_billed_hours: f64,
    pub total_shadow_hours: f64,
    pub total_value_lost: f64,
    pub overall_inertia_ratio: f64,
    pub systemic_blocks: usize,
    pub asset_specific_blocks: usize,
    /// Value lost to block-wide delays, by delay reason.
    pub by_reason: BTreeMap<String, f64>,
    /// Worst efficiency first.
    pub by_spread: Vec<SpreadMetrics>,
    pub daily_trend: Vec<DailyTrend>,
    pub by_responsible_party: PartyBreakdown,
}

#[derive(Debug, Default)]
struct Totals {
    billed: f64,
    shadow: f64,
    value_lost: f64,
    systemic_count: usize,
    asset_count: usize,
}

impl Totals {
    fn add(&mut self, summary: &ShadowAuditSummary) {
        self.billed += summary.total_billed_hours;
        self.shadow += summary.total_shadow_hours;
        self.value_lost += summary.total_value_lost;
        match summary.delay_type {
            DelayType::Systemic => self.systemic_count += 1,
            DelayType::AssetSpecific => self.asset_count += 1,
            DelayType::None => {}
        }
    }
}

/// Accountable party for a delayed block's reason.
pub fn responsible_party(block: &ActivityBlock) -> ResponsibleParty {
    let key = selected_delay_reason(block);
    if let Some(key) = key.filter(|key| DelayReason::from_key(key).is_none()) {
        tracing::warn!(reason = key, block = %block.describe(), "delay reason not in catalog");
    }
    responsible_party_for(key)
}

pub fn aggregate(
    reports: &[DailyReport],
    cache: &SummaryCache,
    rates: &RateLookup,
) -> PortfolioSummary {
    let mut grand = Totals::default();
    let mut block_count = 0;
    let mut cached_blocks = 0;
    let mut by_reason = BTreeMap::<String, f64>::new();
    let mut by_spread = BTreeMap::<String, Totals>::new();
    let mut by_date = BTreeMap::<NaiveDate, Totals>::new();
    let mut parties = PartyBreakdown::default();

    for report in reports {
        let spread = report
            .spread
            .clone()
            .unwrap_or_else(|| UNKNOWN_SPREAD.to_string());

        for (index, block) in report.blocks.iter().enumerate() {
            let (summary, from_cache) = summary_for(report, index, block, cache, rates);
            block_count += 1;
            if from_cache {
                cached_blocks += 1;
            }

            grand.add(&summary);
            by_spread.entry(spread.clone()).or_default().add(&summary);
            if let Some(date) = report.date {
                by_date.entry(date).or_default().add(&summary);
            }

            if summary.delay_type == DelayType::Systemic {
                let reason = block
                    .systemic_delay
                    .as_ref()
                    .and_then(|delay| delay.reason.clone())
                    .unwrap_or_else(|| UNSPECIFIED_REASON.to_string());
                *by_reason.entry(reason).or_insert(0.0) += summary.total_value_lost;
            }

            if summary.delay_type != DelayType::None {
                parties.add(responsible_party(block), summary.total_value_lost);
            }
        }
    }

    let mut spreads = by_spread
        .into_iter()
        .map(|(spread, totals)| SpreadMetrics {
            spread,
            billed: round2(totals.billed),
            shadow: round2(totals.shadow),
            value_lost: round2(totals.value_lost),
            systemic_count: totals.systemic_count,
            asset_count: totals.asset_count,
            inertia_ratio: round1(inertia_ratio(totals.billed, totals.shadow)),
        })
        .collect::<Vec<_>>();
    // Stable sort keeps spreads with equal ratios in name order.
    spreads.sort_by(|a, b| a.inertia_ratio.total_cmp(&b.inertia_ratio));

    let daily_trend = by_date
        .into_iter()
        .map(|(date, totals)| DailyTrend {
            date,
            billed: round2(totals.billed),
            shadow: round2(totals.shadow),
            value_lost: round2(totals.value_lost),
            inertia_ratio: round1(inertia_ratio(totals.billed, totals.shadow)),
        })
        .collect();

    tracing::info!(
        reports = reports.len(),
        blocks = block_count,
        cached = cached_blocks,
        "aggregated portfolio"
    );

    PortfolioSummary {
        block_count,
        cached_blocks,
        total_billed_hours: round2(grand.billed),
        total_shadow_hours: round2(grand.shadow),
        total_value_lost: round2(grand.value_lost),
        overall_inertia_ratio: round1(inertia_ratio(grand.billed, grand.shadow)),
        systemic_blocks: grand.systemic_count,
        asset_specific_blocks: grand.asset_count,
        by_reason: by_reason
            .into_iter()
            .map(|(reason, value)| (reason, round2(value)))
            .collect(),
        by_spread: spreads,
        daily_trend,
        by_responsible_party: parties.rounded(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::block::audit_block;
    use crate::audit::cache::BlockKey;
    use crate::types::block::{EquipmentEntry, LabourEntry, ProductionStatus, SystemicDelay};

    fn labour(rt: f64, status: ProductionStatus, reason: Option<&str>) -> LabourEntry {
        LabourEntry {
            classification: "Labourer".to_string(),
            rt,
            production_status: status,
            delay_reason: reason.map(str::to_string),
            ..LabourEntry::default()
        }
    }

    fn report(id: &str, spread: Option<&str>, date: &str, blocks: Vec<ActivityBlock>) -> DailyReport {
        DailyReport {
            id: Some(id.to_string()),
            spread: spread.map(str::to_string),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            blocks,
            ..DailyReport::default()
        }
    }

    fn weather_block() -> ActivityBlock {
        ActivityBlock {
            labour_entries: vec![labour(8.0, ProductionStatus::Active, None)],
            equipment_entries: vec![EquipmentEntry {
                kind: "Excavator".to_string(),
                hours: 8.0,
                ..EquipmentEntry::default()
            }],
            systemic_delay: Some(SystemicDelay {
                active: true,
                status: ProductionStatus::ManagementDrag,
                reason: Some("extreme_weather".to_string()),
                note: None,
            }),
            ..ActivityBlock::default()
        }
    }

    #[test]
    fn systemic_block_feeds_reason_bucket_and_neutral_party() {
        let reports = vec![report("R-1", Some("Spread 1"), "2026-05-01", vec![weather_block()])];
        let portfolio = aggregate(&reports, &SummaryCache::new(), &RateLookup::default());

        assert_eq!(portfolio.total_billed_hours, 16.0);
        assert_eq!(portfolio.total_shadow_hours, 0.0);
        assert_eq!(portfolio.systemic_blocks, 1);
        assert_eq!(
            portfolio.by_reason.get("extreme_weather").copied(),
            Some(portfolio.total_value_lost)
        );
        assert_eq!(portfolio.by_responsible_party.neutral, portfolio.total_value_lost);
        assert_eq!(portfolio.by_responsible_party.total, portfolio.total_value_lost);
    }

    #[test]
    fn spreads_sort_worst_first_and_default_name_is_unknown() {
        let efficient = ActivityBlock {
            labour_entries: vec![labour(10.0, ProductionStatus::Active, None)],
            ..ActivityBlock::default()
        };
        let dragging = ActivityBlock {
            labour_entries: vec![labour(
                10.0,
                ProductionStatus::SyncDelay,
                Some("equipment_breakdown"),
            )],
            ..ActivityBlock::default()
        };
        let reports = vec![
            report("R-1", Some("Spread 2"), "2026-05-01", vec![efficient]),
            report("R-2", None, "2026-05-01", vec![dragging]),
        ];
        let portfolio = aggregate(&reports, &SummaryCache::new(), &RateLookup::default());

        let names: Vec<_> = portfolio
            .by_spread
            .iter()
            .map(|spread| spread.spread.as_str())
            .collect();
        assert_eq!(names, vec![UNKNOWN_SPREAD, "Spread 2"]);
        assert_eq!(portfolio.by_spread[0].inertia_ratio, 70.0);
        assert_eq!(portfolio.by_spread[0].asset_count, 1);
        assert_eq!(portfolio.by_responsible_party.contractor, 255.0);
        assert!(portfolio.by_reason.is_empty());
        assert_eq!(portfolio.overall_inertia_ratio, 85.0);
    }

    #[test]
    fn daily_trend_is_ordered_by_date_and_skips_undated_reports() {
        let block = || ActivityBlock {
            labour_entries: vec![labour(5.0, ProductionStatus::Active, None)],
            ..ActivityBlock::default()
        };
        let reports = vec![
            report("R-3", None, "2026-05-03", vec![block()]),
            report("R-1", None, "2026-05-01", vec![block(), block()]),
            report("R-x", None, "not a date", vec![block()]),
        ];
        let portfolio = aggregate(&reports, &SummaryCache::new(), &RateLookup::default());

        assert_eq!(portfolio.daily_trend.len(), 2);
        assert_eq!(portfolio.daily_trend[0].billed, 10.0);
        assert!(portfolio.daily_trend[0].date < portfolio.daily_trend[1].date);
        assert_eq!(portfolio.total_billed_hours, 20.0);
    }

    #[test]
    fn valid_cached_summary_is_preferred_over_recompute() {
        let block = weather_block();
        let reports = vec![report("R-1", None, "2026-05-01", vec![block.clone()])];
        let mut cache = SummaryCache::new();
        let mut stored = audit_block(&block, &RateLookup::default());
        stored.total_value_lost = 1234.0;
        cache.insert(BlockKey::for_block(&reports[0], 0, &block), &block, stored);

        let portfolio = aggregate(&reports, &cache, &RateLookup::default());
        assert_eq!(portfolio.cached_blocks, 1);
        assert_eq!(portfolio.total_value_lost, 1234.0);
    }

    #[test]
    fn missing_systemic_reason_goes_to_unspecified_and_unknown_party() {
        let mut block = weather_block();
        if let Some(delay) = block.systemic_delay.as_mut() {
            delay.reason = None;
        }
        let reports = vec![report("R-1", None, "2026-05-01", vec![block])];
        let portfolio = aggregate(&reports, &SummaryCache::new(), &RateLookup::default());
        assert!(portfolio.by_reason.contains_key(UNSPECIFIED_REASON));
        assert_eq!(portfolio.by_responsible_party.unknown, portfolio.total_value_lost);
    }

    #[test]
    fn responsible_party_follows_the_reason_catalog() {
        let owner = ActivityBlock {
            labour_entries: vec![labour(10.0, ProductionStatus::SyncDelay, Some("permit_hold"))],
            ..ActivityBlock::default()
        };
        let stray = ActivityBlock {
            labour_entries: vec![labour(10.0, ProductionStatus::SyncDelay, Some("alien_abduction"))],
            ..ActivityBlock::default()
        };
        assert_eq!(
            responsible_party(&owner),
            responsible_party_for(Some("permit_hold"))
        );
        assert_eq!(responsible_party(&stray), ResponsibleParty::Unknown);
        assert_eq!(responsible_party(&ActivityBlock::default()), ResponsibleParty::Unknown);
    }

    #[test]
    fn empty_portfolio_is_fully_efficient() {
        let portfolio = aggregate(&[], &SummaryCache::new(), &RateLookup::default());
        assert_eq!(portfolio.overall_inertia_ratio, 100.0);
        assert_eq!(portfolio.total_value_lost, 0.0);
        assert!(portfolio.by_spread.is_empty());
    }
}
