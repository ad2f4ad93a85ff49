use crate::types::config::{AuditConfig, DEFAULT_EQUIPMENT_RATE, DEFAULT_LABOUR_RATE};
use std::collections::HashMap;

/// Hourly rates by labour classification and equipment type, with
/// fallbacks for anything not listed.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLookup {
    pub labour: HashMap<String, f64>,
    pub equipment: HashMap<String, f64>,
    pub default_labour: f64,
    pub default_equipment: f64,
}

impl Default for RateLookup {
    fn default() -> Self {
        Self {
            labour: HashMap::new(),
            equipment: HashMap::new(),
            default_labour: DEFAULT_LABOUR_RATE,
            default_equipment: DEFAULT_EQUIPMENT_RATE,
        }
    }
}

impl RateLookup {
    pub fn from_config(config: &AuditConfig) -> Self {
        let defaults = Self::default();
        match &config.rates {
            Some(rates) => Self {
                labour: rates.labour.clone(),
                equipment: rates.equipment.clone(),
                default_labour: rates.default_labour.unwrap_or(defaults.default_labour),
                default_equipment: rates
                    .default_equipment
                    .unwrap_or(defaults.default_equipment),
            },
            None => defaults,
        }
    }

    pub fn labour_rate(&self, classification: &str) -> f64 {
        self.labour
            .get(classification)
            .copied()
            .unwrap_or(self.default_labour)
    }

    pub fn equipment_rate(&self, kind: &str) -> f64 {
        self.equipment
            .get(kind)
            .copied()
            .unwrap_or(self.default_equipment)
    }
}
