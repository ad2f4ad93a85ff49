use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthCategoryKind {
    PhotoCompleteness,
    Directive050,
    FieldCompleteness,
    ChainageIntegrity,
    LabourEquipment,
    MentorAlerts,
}

impl HealthCategoryKind {
    pub const ALL: [HealthCategoryKind; 6] = [
        Self::PhotoCompleteness,
        Self::Directive050,
        Self::FieldCompleteness,
        Self::ChainageIntegrity,
        Self::LabourEquipment,
        Self::MentorAlerts,
    ];

    /// Key used in `[health.weights]`.
    pub fn key(self) -> &'static str {
        match self {
            Self::PhotoCompleteness => "photo_completeness",
            Self::Directive050 => "directive_050",
            Self::FieldCompleteness => "field_completeness",
            Self::ChainageIntegrity => "chainage_integrity",
            Self::LabourEquipment => "labour_equipment",
            Self::MentorAlerts => "mentor_alerts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PhotoCompleteness => "Photo Completeness",
            Self::Directive050 => "Directive 050 Compliance",
            Self::FieldCompleteness => "Field Completeness",
            Self::ChainageIntegrity => "Chainage Integrity",
            Self::LabourEquipment => "Labour/Equipment Documentation",
            Self::MentorAlerts => "Mentor Alert Resolution",
        }
    }

    pub fn default_weight(self) -> f64 {
        match self {
            Self::PhotoCompleteness => 25.0,
            Self::Directive050 => 20.0,
            Self::FieldCompleteness => 20.0,
            Self::ChainageIntegrity => 15.0,
            Self::LabourEquipment => 10.0,
            Self::MentorAlerts => 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCategory {
    pub score: f64,
    pub weight: f64,
    pub issues: Vec<String>,
}

impl HealthCategory {
    /// `passed / total` as a percentage, 100 when `total` is zero.
    pub fn from_ratio(passed: usize, total: usize, weight: f64, issues: Vec<String>) -> Self {
        let score = if total == 0 {
            100.0
        } else {
            (passed.min(total) as f64 / total as f64) * 100.0
        };
        Self {
            score,
            weight,
            issues,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDetails {
    pub photo_completeness: HealthCategory,
    pub directive_050: HealthCategory,
    pub field_completeness: HealthCategory,
    pub chainage_integrity: HealthCategory,
    pub labour_equipment: HealthCategory,
    pub mentor_alerts: HealthCategory,
}

impl HealthDetails {
    pub fn categories(&self) -> [(HealthCategoryKind, &HealthCategory); 6] {
        [
            (HealthCategoryKind::PhotoCompleteness, &self.photo_completeness),
            (HealthCategoryKind::Directive050, &self.directive_050),
            (HealthCategoryKind::FieldCompleteness, &self.field_completeness),
            (HealthCategoryKind::ChainageIntegrity, &self.chainage_integrity),
            (HealthCategoryKind::LabourEquipment, &self.labour_equipment),
            (HealthCategoryKind::MentorAlerts, &self.mentor_alerts),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub score: f64,
    pub details: HealthDetails,
    pub passing: bool,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one_hundred() {
        let total: f64 = HealthCategoryKind::ALL
            .iter()
            .map(|kind| kind.default_weight())
            .sum();
        assert!((total - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_with_no_items_is_perfect() {
        assert_eq!(HealthCategory::from_ratio(0, 0, 10.0, Vec::new()).score, 100.0);
        assert_eq!(HealthCategory::from_ratio(1, 4, 10.0, Vec::new()).score, 25.0);
    }
}
