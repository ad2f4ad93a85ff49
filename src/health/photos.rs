use crate::types::block::ActivityBlock;
use crate::types::scoring::HealthCategory;

/// Concealed-work blocks need at least one photo; the work is buried by the
/// time anyone else could look at it.
pub fn photo_completeness(blocks: &[ActivityBlock], weight: f64) -> HealthCategory {
    let concealed = blocks
        .iter()
        .filter(|block| block.activity_type.is_concealed_work())
        .collect::<Vec<_>>();
    let issues = concealed
        .iter()
        .filter(|block| block.photo_count() == 0)
        .map(|block| format!("{} is concealed work with no photos", block.describe()))
        .collect::<Vec<_>>();
    let documented = concealed.len() - issues.len();
    HealthCategory::from_ratio(documented, concealed.len(), weight, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::activity::ActivityType;
    use serde_json::json;

    fn block(activity: ActivityType, photos: usize) -> ActivityBlock {
        ActivityBlock {
            activity_type: activity,
            work_photos: (0..photos).map(|i| json!({ "url": format!("p{i}.jpg") })).collect(),
            ..ActivityBlock::default()
        }
    }

    #[test]
    fn only_concealed_work_counts() {
        let blocks = vec![
            block(ActivityType::LowerIn, 2),
            block(ActivityType::Backfill, 0),
            block(ActivityType::Grading, 0),
        ];
        let category = photo_completeness(&blocks, 25.0);
        assert_eq!(category.score, 50.0);
        assert_eq!(category.issues.len(), 1);
        assert!(category.issues[0].starts_with("Backfill"));
    }

    #[test]
    fn no_concealed_work_is_perfect() {
        let category = photo_completeness(&[block(ActivityType::Access, 0)], 25.0);
        assert_eq!(category.score, 100.0);
        assert!(category.issues.is_empty());
    }
}
