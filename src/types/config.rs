use crate::error::AuditError;
use crate::types::scoring::HealthCategoryKind;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_LABOUR_RATE: f64 = 85.0;
pub const DEFAULT_EQUIPMENT_RATE: f64 = 150.0;
pub const DEFAULT_HEALTH_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    pub project: Option<ProjectConfig>,
    pub rates: Option<RatesConfig>,
    pub health: Option<HealthConfig>,
    pub verification: Option<VerificationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub contract: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesConfig {
    pub default_labour: Option<f64>,
    pub default_equipment: Option<f64>,
    /// Hourly rate by labour classification.
    #[serde(default)]
    pub labour: HashMap<String, f64>,
    /// Hourly rate by equipment type.
    #[serde(default)]
    pub equipment: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthConfig {
    pub threshold: Option<f64>,
    pub weights: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationConfig {
    pub high_efficiency_inertia: Option<f64>,
    pub critical_production_ratio: Option<f64>,
    pub questionable_drag_gap: Option<f64>,
    pub min_quality_rate: Option<f64>,
    pub questionable_quality_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationThresholds {
    /// Inertia ratio at or above which a block claims full production.
    pub high_efficiency_inertia: f64,
    /// Production ratio under which a full-production claim is not credible.
    pub critical_production_ratio: f64,
    pub questionable_drag_gap: f64,
    pub min_quality_rate: f64,
    pub questionable_quality_rate: f64,
}

impl Default for VerificationThresholds {
    fn default() -> Self {
        Self {
            high_efficiency_inertia: 90.0,
            critical_production_ratio: 50.0,
            questionable_drag_gap: 25.0,
            min_quality_rate: 85.0,
            questionable_quality_rate: 95.0,
        }
    }
}

impl AuditConfig {
    pub fn default_weights() -> [f64; 6] {
        HealthCategoryKind::ALL.map(HealthCategoryKind::default_weight)
    }

    pub fn weights(&self) -> [f64; 6] {
        match self.health.as_ref().and_then(|health| health.weights.as_ref()) {
            Some(weights) => HealthCategoryKind::ALL.map(|kind| {
                weights
                    .get(kind.key())
                    .copied()
                    .unwrap_or_else(|| kind.default_weight())
            }),
            None => Self::default_weights(),
        }
    }

    pub fn health_threshold(&self) -> f64 {
        self.health
            .as_ref()
            .and_then(|health| health.threshold)
            .unwrap_or(DEFAULT_HEALTH_THRESHOLD)
    }

    pub fn verification_thresholds(&self) -> VerificationThresholds {
        let defaults = VerificationThresholds::default();
        match &self.verification {
            Some(verification) => VerificationThresholds {
                high_efficiency_inertia: verification
                    .high_efficiency_inertia
                    .unwrap_or(defaults.high_efficiency_inertia),
                critical_production_ratio: verification
                    .critical_production_ratio
                    .unwrap_or(defaults.critical_production_ratio),
                questionable_drag_gap: verification
                    .questionable_drag_gap
                    .unwrap_or(defaults.questionable_drag_gap),
                min_quality_rate: verification
                    .min_quality_rate
                    .unwrap_or(defaults.min_quality_rate),
                questionable_quality_rate: verification
                    .questionable_quality_rate
                    .unwrap_or(defaults.questionable_quality_rate),
            },
            None => defaults,
        }
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if let Some(rates) = &self.rates {
            for (name, rate) in [
                ("rates.default_labour", rates.default_labour),
                ("rates.default_equipment", rates.default_equipment),
            ] {
                if rate.is_some_and(|rate| !rate.is_finite() || rate < 0.0) {
                    return Err(AuditError::ConfigParse(format!(
                        "{name} must be a non-negative number"
                    )));
                }
            }
            for (table, map) in [("rates.labour", &rates.labour), ("rates.equipment", &rates.equipment)] {
                if let Some((key, _)) = map
                    .iter()
                    .find(|(_, rate)| !rate.is_finite() || **rate < 0.0)
                {
                    return Err(AuditError::ConfigParse(format!(
                        "{table}.\"{key}\" must be a non-negative number"
                    )));
                }
            }
        }

        if let Some(health) = &self.health {
            if let Some(threshold) = health.threshold {
                if !(0.0..=100.0).contains(&threshold) {
                    return Err(AuditError::ConfigParse(
                        "health.threshold must be between 0 and 100".to_string(),
                    ));
                }
            }

            if let Some(weights) = &health.weights {
                let allowed = HealthCategoryKind::ALL.map(HealthCategoryKind::key);
                let mut unknown = weights
                    .keys()
                    .filter(|key| !allowed.contains(&key.as_str()))
                    .cloned()
                    .collect::<Vec<_>>();
                if !unknown.is_empty() {
                    unknown.sort();
                    return Err(AuditError::ConfigParse(format!(
                        "health.weights contains unknown key(s): {}",
                        unknown.join(", ")
                    )));
                }
            }

            let weights = self.weights();
            if weights.iter().any(|weight| !(0.0..=100.0).contains(weight)) {
                return Err(AuditError::ConfigParse(
                    "health.weights values must be between 0 and 100".to_string(),
                ));
            }
            let weight_sum: f64 = weights.iter().sum();
            if (weight_sum - 100.0).abs() > 0.001 {
                return Err(AuditError::ConfigParse(format!(
                    "health.weights must sum to 100 (found {weight_sum:.3})"
                )));
            }
        }

        let thresholds = self.verification_thresholds();
        for (name, value) in [
            (
                "verification.high_efficiency_inertia",
                thresholds.high_efficiency_inertia,
            ),
            (
                "verification.critical_production_ratio",
                thresholds.critical_production_ratio,
            ),
            (
                "verification.questionable_drag_gap",
                thresholds.questionable_drag_gap,
            ),
            ("verification.min_quality_rate", thresholds.min_quality_rate),
            (
                "verification.questionable_quality_rate",
                thresholds.questionable_quality_rate,
            ),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AuditError::ConfigParse(format!(
                    "{name} must be between 0 and 100"
                )));
            }
        }
        if thresholds.questionable_quality_rate < thresholds.min_quality_rate {
            return Err(AuditError::ConfigParse(
                "verification.questionable_quality_rate cannot be below verification.min_quality_rate"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
