use crate::types::block::ActivityBlock;
use crate::types::chainage::parse_kp;
use crate::types::scoring::HealthCategory;
use std::collections::BTreeMap;

/// Metres of slack before consecutive blocks count as a gap or overlap.
pub const CHAINAGE_TOLERANCE: f64 = 0.001;

struct Placed<'a> {
    block: &'a ActivityBlock,
    start: f64,
    end: f64,
}

/// Within each activity type, consecutive blocks must meet end to start
/// unless the block explains the gap or overlap.
pub fn chainage_integrity(blocks: &[ActivityBlock], weight: f64) -> HealthCategory {
    let mut issues = Vec::new();
    let mut by_activity = BTreeMap::<String, Vec<Placed<'_>>>::new();

    for block in blocks.iter().filter(|block| block.activity_type.is_specified()) {
        let (Some(start_raw), Some(end_raw)) = (block.start_kp.as_deref(), block.end_kp.as_deref())
        else {
            continue;
        };
        match (parse_kp(start_raw), parse_kp(end_raw)) {
            (Some(start), Some(end)) => by_activity
                .entry(block.activity_type.label().to_string())
                .or_default()
                .push(Placed { block, start, end }),
            _ => issues.push(format!(
                "{} has unreadable chainage; expected the form 12+500",
                block.describe()
            )),
        }
    }

    let mut found = 0;
    let mut documented = 0;
    for (activity, mut placed) in by_activity {
        placed.sort_by(|a, b| a.start.total_cmp(&b.start));
        for pair in placed.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            let difference = current.start - previous.end;
            let (kind, reason) = if difference > CHAINAGE_TOLERANCE {
                ("gap", current.block.chainage_gap_reason.as_ref())
            } else if difference < -CHAINAGE_TOLERANCE {
                ("overlap", current.block.chainage_overlap_reason.as_ref())
            } else {
                continue;
            };
            found += 1;
            if reason.is_some() {
                documented += 1;
            } else {
                issues.push(format!(
                    "{activity}: undocumented {:.1} m {kind} between KP {} and KP {}",
                    difference.abs(),
                    previous.block.end_kp.as_deref().unwrap_or("?"),
                    current.block.start_kp.as_deref().unwrap_or("?"),
                ));
            }
        }
    }

    HealthCategory::from_ratio(documented, found, weight, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::activity::ActivityType;

    fn block(activity: ActivityType, start: &str, end: &str) -> ActivityBlock {
        ActivityBlock {
            activity_type: activity,
            start_kp: Some(start.to_string()),
            end_kp: Some(end.to_string()),
            ..ActivityBlock::default()
        }
    }

    #[test]
    fn contiguous_blocks_have_no_issues() {
        let blocks = vec![
            block(ActivityType::Welding, "1+400", "1+800"),
            block(ActivityType::Welding, "1+000", "1+400"),
        ];
        let category = chainage_integrity(&blocks, 15.0);
        assert_eq!(category.score, 100.0);
        assert!(category.issues.is_empty());
    }

    #[test]
    fn only_documented_gaps_and_overlaps_score() {
        let mut documented_gap = block(ActivityType::Welding, "1+500", "1+900");
        documented_gap.chainage_gap_reason = Some("road crossing bored separately".to_string());
        let blocks = vec![
            block(ActivityType::Welding, "1+000", "1+400"),
            documented_gap,
            block(ActivityType::Welding, "1+850", "2+000"),
        ];
        let category = chainage_integrity(&blocks, 15.0);
        assert_eq!(category.score, 50.0);
        assert_eq!(category.issues.len(), 1);
        assert!(category.issues[0].contains("50.0 m overlap"));
    }

    #[test]
    fn different_activities_are_compared_separately() {
        let blocks = vec![
            block(ActivityType::Welding, "1+000", "1+400"),
            block(ActivityType::Coating, "3+000", "3+400"),
        ];
        assert_eq!(chainage_integrity(&blocks, 15.0).score, 100.0);
    }

    #[test]
    fn unreadable_chainage_is_reported() {
        let blocks = vec![block(ActivityType::Ditch, "one", "1+400")];
        let category = chainage_integrity(&blocks, 15.0);
        assert_eq!(category.score, 100.0);
        assert_eq!(category.issues.len(), 1);
    }
}
