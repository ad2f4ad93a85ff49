use crate::types::activity::ActivityType;
use crate::types::block::ActivityBlock;
use crate::types::lenient::is_filled;
use crate::types::scoring::HealthCategory;

pub fn field_completeness(blocks: &[ActivityBlock], weight: f64) -> HealthCategory {
    let mut filled = 0;
    let mut required = 0;
    let mut issues = Vec::new();

    for block in blocks {
        if let ActivityType::Unrecognized(label) = &block.activity_type {
            issues.push(format!(
                "activity type '{label}' has no field catalog; its quality data was not checked"
            ));
            continue;
        }

        let mut missing = Vec::new();
        for spec in block.activity_type.required_fields() {
            required += 1;
            if block.quality_data.get(spec.key).is_some_and(is_filled) {
                filled += 1;
            } else {
                missing.push(spec.label);
            }
        }
        if !missing.is_empty() {
            issues.push(format!("{}: missing {}", block.describe(), missing.join(", ")));
        }
    }

    HealthCategory::from_ratio(filled, required, weight, issues)
}
