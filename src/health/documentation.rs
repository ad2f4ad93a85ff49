use crate::types::block::ActivityBlock;
use crate::types::scoring::HealthCategory;

/// Every classified block should show who did the work and with what.
pub fn labour_equipment(blocks: &[ActivityBlock], weight: f64) -> HealthCategory {
    let active = blocks
        .iter()
        .filter(|block| block.activity_type.is_specified())
        .collect::<Vec<_>>();
    let mut issues = Vec::new();
    for block in &active {
        match (
            block.labour_entries.is_empty(),
            block.equipment_entries.is_empty(),
        ) {
            (false, false) => {}
            (true, true) => issues.push(format!(
                "{} has no labour or equipment entries",
                block.describe()
            )),
            (true, false) => issues.push(format!("{} has no labour entries", block.describe())),
            (false, true) => {
                issues.push(format!("{} has no equipment entries", block.describe()))
            }
        }
    }
    let documented = active.len() - issues.len();
    HealthCategory::from_ratio(documented, active.len(), weight, issues)
}
