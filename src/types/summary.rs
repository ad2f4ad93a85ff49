use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayType {
    #[default]
    None,
    AssetSpecific,
    Systemic,
}

impl DelayType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::AssetSpecific => "ASSET_SPECIFIC",
            Self::Systemic => "SYSTEMIC",
        }
    }
}

impl fmt::Display for DelayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived efficiency figures for one activity block.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowAuditSummary {
    pub total_billed_hours: f64,
    pub total_shadow_hours: f64,
    /// Shadow as a percentage of billed, one decimal place.
    pub inertia_ratio: f64,
    pub total_value_lost: f64,
    pub delay_type: DelayType,
    /// Hourly cost of the whole crew and equipment spread on the block.
    pub block_burn_rate: f64,
    /// Whether a block-wide delay overrode the entry statuses.
    pub systemic_delay: bool,
}
