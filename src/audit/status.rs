use crate::types::block::ProductionStatus;
use crate::types::reason::DelayReason;

/// Fraction of billed time that counts as productive for a status.
pub fn multiplier(status: ProductionStatus) -> f64 {
    match status {
        ProductionStatus::Active => 1.0,
        ProductionStatus::SyncDelay => 0.7,
        ProductionStatus::ManagementDrag => 0.0,
        ProductionStatus::Unknown => 1.0,
    }
}

/// Whether selecting `reason` should switch the block-wide delay on.
/// Reasons outside the catalog default to per-entry.
pub fn is_systemic_by_default(reason: &str) -> bool {
    DelayReason::from_key(reason)
        .map(|reason| reason.traits().default_systemic)
        .unwrap_or(false)
}
