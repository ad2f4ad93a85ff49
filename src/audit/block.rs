use super::entry::TimeEntry;
use super::rates::RateLookup;
use super::status::multiplier;
use crate::types::block::ActivityBlock;
use crate::types::summary::{DelayType, ShadowAuditSummary};

/// Labour entries first, then equipment.
pub fn time_entries(block: &ActivityBlock) -> impl Iterator<Item = &dyn TimeEntry> {
    block
        .labour_entries
        .iter()
        .map(|entry| entry as &dyn TimeEntry)
        .chain(
            block
                .equipment_entries
                .iter()
                .map(|entry| entry as &dyn TimeEntry),
        )
}

pub fn total_billed_hours(block: &ActivityBlock) -> f64 {
    time_entries(block).map(|entry| entry.billed_hours()).sum()
}

pub fn block_burn_rate(block: &ActivityBlock, rates: &RateLookup) -> f64 {
    time_entries(block).map(|entry| entry.burn_rate(rates)).sum()
}

/// Shadow as a percentage of billed; a block with nothing billed is 100%.
pub fn inertia_ratio(billed: f64, shadow: f64) -> f64 {
    if billed > 0.0 {
        shadow / billed * 100.0
    } else {
        100.0
    }
}

pub fn delay_type(block: &ActivityBlock) -> DelayType {
    if block.overriding_delay().is_some() {
        DelayType::Systemic
    } else if time_entries(block).any(|entry| entry.status().is_delay()) {
        DelayType::AssetSpecific
    } else {
        DelayType::None
    }
}

/// The reason a delayed block is charged to: the block-wide reason when it
/// overrides, else the first delayed entry's reason.
pub fn selected_delay_reason(block: &ActivityBlock) -> Option<&str> {
    match block.overriding_delay() {
        Some(delay) => delay.reason.as_deref(),
        None => time_entries(block)
            .find(|entry| entry.status().is_delay())
            .and_then(|entry| entry.delay_reason()),
    }
}

pub fn audit_block(block: &ActivityBlock, rates: &RateLookup) -> ShadowAuditSummary {
    let total_billed = total_billed_hours(block);
    let burn_rate = block_burn_rate(block, rates);

    let (total_shadow, value_lost) = match block.overriding_delay() {
        Some(delay) => {
            let shadow = total_billed * multiplier(delay.status);
            // Block burn rate stands in for the average hourly rate here.
            let average_rate = if total_billed > 0.0 { burn_rate } else { 0.0 };
            (shadow, (total_billed - shadow) * average_rate)
        }
        None => time_entries(block).fold((0.0, 0.0), |(shadow, lost), entry| {
            let entry_shadow = entry.shadow_hours();
            let hours_lost = entry.billed_hours() - entry_shadow;
            (
                shadow + entry_shadow,
                lost + hours_lost * entry.hourly_rate(rates),
            )
        }),
    };

    let summary = ShadowAuditSummary {
        total_billed_hours: round2(total_billed),
        total_shadow_hours: round2(total_shadow),
        inertia_ratio: round1(inertia_ratio(total_billed, total_shadow)),
        total_value_lost: round2(value_lost),
        delay_type: delay_type(block),
        block_burn_rate: round2(burn_rate),
        systemic_delay: block.overriding_delay().is_some(),
    };
    tracing::debug!(
        block = %block.describe(),
        billed = summary.total_billed_hours,
        shadow = summary.total_shadow_hours,
        delay = %summary.delay_type,
        "audited block"
    );
    summary
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
