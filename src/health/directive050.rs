use crate::types::block::{ActivityBlock, WasteData};
use crate::types::lenient::is_filled;
use crate::types::scoring::HealthCategory;

/// Allowed difference (m³) between volume mixed and volume accounted for.
pub const VOLUME_BALANCE_TOLERANCE: f64 = 0.5;

/// Drilling waste checks: volumes balance, the disposal facility is named
/// when anything was hauled, and the additives used are listed.
pub fn directive_050(blocks: &[ActivityBlock], weight: f64) -> HealthCategory {
    let mut passed = 0;
    let mut total = 0;
    let mut issues = Vec::new();

    for block in blocks.iter().filter(|block| block.activity_type.is_drilling()) {
        let Some(waste) = &block.waste_data else {
            issues.push(format!(
                "{} is a drilling activity with no waste data recorded",
                block.describe()
            ));
            continue;
        };
        for (ok, issue) in checks(waste) {
            total += 1;
            if ok {
                passed += 1;
            } else {
                issues.push(format!("{}: {issue}", block.describe()));
            }
        }
    }

    HealthCategory::from_ratio(passed, total, weight, issues)
}

fn checks(waste: &WasteData) -> [(bool, String); 3] {
    let accounted = waste.hauled + waste.stored;
    let balanced = (accounted - waste.total_mixed).abs() <= VOLUME_BALANCE_TOLERANCE;
    let facility_ok = waste.hauled <= 0.0 || waste.disposal_facility.is_some();
    let additives_ok = waste.additives.iter().any(is_filled);
    [
        (
            balanced,
            format!(
                "hauled + stored ({accounted:.2} m³) does not balance total mixed ({:.2} m³)",
                waste.total_mixed
            ),
        ),
        (
            facility_ok,
            format!(
                "{:.2} m³ hauled with no disposal facility recorded",
                waste.hauled
            ),
        ),
        (additives_ok, "no drilling fluid additives recorded".to_string()),
    ]
}
