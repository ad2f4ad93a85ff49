//! Cross-checks of claimed efficiency against physical output and quality.
//!
//! A crew can keep its inertia ratio high by booking every hour as
//! productive. Metres actually laid and inspection pass rates are harder to
//! dress up, so blocks whose claims and output disagree are flagged, and
//! rework is folded into the true cost of completion.

use crate::audit::block::{round1, round2};
use crate::audit::cache::SummaryCache;
use crate::audit::rates::RateLookup;
use crate::audit::summary_for;
use crate::portfolio;
use crate::types::block::ActivityBlock;
use crate::types::chainage::span_metres;
use crate::types::config::VerificationThresholds;
use crate::types::daily::DailyReport;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reliability {
    Reliable,
    Questionable,
    Unreliable,
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reliable => "RELIABLE",
            Self::Questionable => "QUESTIONABLE",
            Self::Unreliable => "UNRELIABLE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVerification {
    pub block: String,
    pub reliability: Reliability,
    pub inertia_ratio: f64,
    pub metres: Option<f64>,
    pub production_ratio: Option<f64>,
    pub quality_rate: Option<f64>,
    pub productivity_drag_penalty: Option<f64>,
    pub rework_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub overall_reliability: Reliability,
    pub total_linear_metres: f64,
    pub overall_production_ratio: Option<f64>,
    pub overall_quality_rate: Option<f64>,
    pub total_rework_cost: f64,
    pub avg_productivity_drag_penalty: f64,
    pub critical_alerts: Vec<String>,
    pub unreliable_blocks: usize,
    pub questionable_blocks: usize,
    pub total_value_lost: f64,
    pub true_cost_of_completion: f64,
    pub blocks: Vec<BlockVerification>,
}

/// Metres finished on the block: the recorded figure when it is not
/// negative, else the chainage span when it is positive.
pub fn metres_completed(block: &ActivityBlock) -> Option<f64> {
    block.metres_completed.filter(|metres| *metres >= 0.0).or_else(|| {
        span_metres(block.start_kp.as_deref(), block.end_kp.as_deref()).filter(|span| *span > 0.0)
    })
}

/// Rework items without a cost are charged at the default labour rate.
pub fn rework_cost(block: &ActivityBlock, rates: &RateLookup) -> f64 {
    block
        .rework
        .iter()
        .map(|item| match item.cost {
            Some(cost) => cost.max(0.0),
            None => item.hours.unwrap_or(0.0).max(0.0) * rates.default_labour,
        })
        .sum()
}

#[derive(Debug, Default)]
struct Accumulator {
    metres: f64,
    planned_metres: f64,
    produced_against_plan: f64,
    inspected: f64,
    passed: f64,
    rework: f64,
    drag_penalties: Vec<f64>,
    alerts: Vec<String>,
    unreliable: usize,
    questionable: usize,
}

fn verify_block(
    block: &ActivityBlock,
    inertia: f64,
    rates: &RateLookup,
    thresholds: &VerificationThresholds,
    acc: &mut Accumulator,
) -> BlockVerification {
    let mut reliability = Reliability::Reliable;
    let metres = metres_completed(block);
    if let Some(metres) = metres {
        acc.metres += metres;
    }

    let mut production_ratio = None;
    let mut drag_penalty = None;
    if let (Some(metres), Some(planned)) = (metres, block.planned_metres.filter(|p| *p > 0.0)) {
        let ratio = metres / planned * 100.0;
        let penalty = (inertia - ratio).max(0.0);
        acc.planned_metres += planned;
        acc.produced_against_plan += metres;
        acc.drag_penalties.push(penalty);
        production_ratio = Some(ratio);
        drag_penalty = Some(penalty);

        if inertia >= thresholds.high_efficiency_inertia
            && ratio < thresholds.critical_production_ratio
        {
            reliability = Reliability::Unreliable;
            acc.alerts.push(format!(
                "{}: claimed {:.1}% efficiency but only {:.1}% of planned metres completed",
                block.describe(),
                inertia,
                ratio
            ));
        } else if penalty > thresholds.questionable_drag_gap {
            reliability = reliability.max(Reliability::Questionable);
        }
    }

    let mut quality_rate = None;
    if let Some(inspection) = block.inspection.as_ref().filter(|i| i.inspected > 0.0) {
        let rejected = inspection.rejected.min(inspection.inspected);
        let passed = inspection.inspected - rejected;
        let rate = passed / inspection.inspected * 100.0;
        acc.inspected += inspection.inspected;
        acc.passed += passed;
        quality_rate = Some(rate);

        if rate < thresholds.min_quality_rate {
            reliability = Reliability::Unreliable;
            acc.alerts.push(format!(
                "{}: inspection pass rate {:.1}% is below {:.1}%",
                block.describe(),
                rate,
                thresholds.min_quality_rate
            ));
        } else if rate < thresholds.questionable_quality_rate {
            reliability = reliability.max(Reliability::Questionable);
        }
    }

    let rework = rework_cost(block, rates);
    acc.rework += rework;

    match reliability {
        Reliability::Unreliable => acc.unreliable += 1,
        Reliability::Questionable => acc.questionable += 1,
        Reliability::Reliable => {}
    }

    BlockVerification {
        block: block.describe(),
        reliability,
        inertia_ratio: inertia,
        metres: metres.map(round2),
        production_ratio: production_ratio.map(round1),
        quality_rate: quality_rate.map(round1),
        productivity_drag_penalty: drag_penalty.map(round1),
        rework_cost: round2(rework),
    }
}

pub fn verify(
    reports: &[DailyReport],
    cache: &SummaryCache,
    rates: &RateLookup,
    thresholds: &VerificationThresholds,
) -> VerificationReport {
    let mut acc = Accumulator::default();
    let mut blocks = Vec::new();

    for report in reports {
        for (index, block) in report.blocks.iter().enumerate() {
            let (summary, _) = summary_for(report, index, block, cache, rates);
            blocks.push(verify_block(
                block,
                summary.inertia_ratio,
                rates,
                thresholds,
                &mut acc,
            ));
        }
    }

    let overall_production_ratio = (acc.planned_metres > 0.0)
        .then(|| round1(acc.produced_against_plan / acc.planned_metres * 100.0));
    let overall_quality_rate =
        (acc.inspected > 0.0).then(|| round1(acc.passed / acc.inspected * 100.0));
    let avg_productivity_drag_penalty = if acc.drag_penalties.is_empty() {
        0.0
    } else {
        acc.drag_penalties.iter().sum::<f64>() / acc.drag_penalties.len() as f64
    };

    let quality_failed = overall_quality_rate.is_some_and(|rate| rate < thresholds.min_quality_rate);
    let overall_reliability = if acc.unreliable > 0 || quality_failed {
        Reliability::Unreliable
    } else if acc.questionable > 0 {
        Reliability::Questionable
    } else {
        Reliability::Reliable
    };

    let total_value_lost = portfolio::aggregate(reports, cache, rates).total_value_lost;
    let total_rework_cost = round2(acc.rework);

    tracing::info!(
        reliability = %overall_reliability,
        unreliable = acc.unreliable,
        questionable = acc.questionable,
        "verified efficiency claims"
    );

    VerificationReport {
        overall_reliability,
        total_linear_metres: round2(acc.metres),
        overall_production_ratio,
        overall_quality_rate,
        total_rework_cost,
        avg_productivity_drag_penalty: round1(avg_productivity_drag_penalty),
        critical_alerts: acc.alerts,
        unreliable_blocks: acc.unreliable,
        questionable_blocks: acc.questionable,
        total_value_lost,
        true_cost_of_completion: round2(total_value_lost + total_rework_cost),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::block::{Inspection, LabourEntry, ProductionStatus, ReworkItem};

    fn block(status: ProductionStatus) -> ActivityBlock {
        ActivityBlock {
            activity_type: crate::types::activity::ActivityType::Welding,
            start_kp: Some("1+000".to_string()),
            end_kp: Some("1+100".to_string()),
            labour_entries: vec![LabourEntry {
                classification: "Welder".to_string(),
                rt: 10.0,
                production_status: status,
                ..LabourEntry::default()
            }],
            ..ActivityBlock::default()
        }
    }

    fn run(blocks: Vec<ActivityBlock>) -> VerificationReport {
        let reports = vec![DailyReport {
            id: Some("R-1".to_string()),
            blocks,
            ..DailyReport::default()
        }];
        verify(
            &reports,
            &SummaryCache::new(),
            &RateLookup::default(),
            &VerificationThresholds::default(),
        )
    }

    #[test]
    fn full_efficiency_with_low_output_is_critical() {
        let mut claimed = block(ProductionStatus::Active);
        claimed.planned_metres = Some(500.0);
        let report = run(vec![claimed]);

        assert_eq!(report.overall_reliability, Reliability::Unreliable);
        assert_eq!(report.unreliable_blocks, 1);
        assert_eq!(report.total_linear_metres, 100.0);
        assert_eq!(report.overall_production_ratio, Some(20.0));
        assert_eq!(report.avg_productivity_drag_penalty, 80.0);
        assert_eq!(report.critical_alerts.len(), 1);
        assert!(report.critical_alerts[0].contains("claimed 100.0% efficiency"));
    }

    #[test]
    fn moderate_gap_is_questionable() {
        let mut claimed = block(ProductionStatus::Active);
        claimed.planned_metres = Some(150.0);
        let report = run(vec![claimed]);

        assert_eq!(report.overall_reliability, Reliability::Questionable);
        assert_eq!(report.questionable_blocks, 1);
        assert!(report.critical_alerts.is_empty());
    }

    #[test]
    fn missing_signals_skip_checks() {
        let mut bare = block(ProductionStatus::Active);
        bare.start_kp = None;
        let report = run(vec![bare]);

        assert_eq!(report.overall_reliability, Reliability::Reliable);
        assert_eq!(report.overall_production_ratio, None);
        assert_eq!(report.overall_quality_rate, None);
        assert_eq!(report.total_linear_metres, 0.0);
        assert_eq!(report.avg_productivity_drag_penalty, 0.0);
        assert_eq!(report.blocks[0].metres, None);
    }

    #[test]
    fn negative_recorded_metres_fall_back_to_chainage() {
        let mut claimed = block(ProductionStatus::Active);
        claimed.metres_completed = Some(-40.0);
        claimed.planned_metres = Some(100.0);
        assert_eq!(metres_completed(&claimed), Some(100.0));

        claimed.start_kp = None;
        assert_eq!(metres_completed(&claimed), None);
        let report = run(vec![claimed]);
        assert_eq!(report.total_linear_metres, 0.0);
        assert_eq!(report.overall_reliability, Reliability::Reliable);
        assert!(report.critical_alerts.is_empty());
    }

    #[test]
    fn poor_inspection_results_are_unreliable() {
        let mut inspected = block(ProductionStatus::Active);
        inspected.inspection = Some(Inspection {
            inspected: 20.0,
            rejected: 5.0,
        });
        let report = run(vec![inspected]);

        assert_eq!(report.overall_quality_rate, Some(75.0));
        assert_eq!(report.overall_reliability, Reliability::Unreliable);
        assert!(report.critical_alerts[0].contains("pass rate 75.0%"));
    }

    #[test]
    fn true_cost_adds_rework_to_value_lost() {
        let mut delayed = block(ProductionStatus::SyncDelay);
        delayed.rework = vec![
            ReworkItem {
                description: "cut out weld 14".to_string(),
                hours: None,
                cost: Some(1_000.0),
            },
            ReworkItem {
                description: "recoat field joint".to_string(),
                hours: Some(2.0),
                cost: None,
            },
        ];
        let report = run(vec![delayed]);

        // 3 lost hours at the default labour rate.
        assert_eq!(report.total_value_lost, 255.0);
        assert_eq!(report.total_rework_cost, 1_170.0);
        assert_eq!(report.true_cost_of_completion, 1_425.0);
    }
}
