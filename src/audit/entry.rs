use super::rates::RateLookup;
use super::status::multiplier;
use crate::types::block::{EquipmentEntry, LabourEntry, ProductionStatus};

/// A line of billed time on a block, labour or equipment.
pub trait TimeEntry {
    fn billed_hours(&self) -> f64;
    fn count(&self) -> u32;
    fn status(&self) -> ProductionStatus;
    fn manual_shadow_hours(&self) -> Option<f64>;
    fn delay_reason(&self) -> Option<&str>;
    fn delay_note(&self) -> Option<&str>;
    fn hourly_rate(&self, rates: &RateLookup) -> f64;
    fn describe(&self) -> String;

    /// Productive hours. A manual figure wins over the status multiplier.
    fn shadow_hours(&self) -> f64 {
        shadow_hours(self.billed_hours(), self.status(), self.manual_shadow_hours())
    }

    /// Cost per hour of every unit on this line.
    fn burn_rate(&self, rates: &RateLookup) -> f64 {
        self.hourly_rate(rates) * f64::from(self.count())
    }
}

pub fn shadow_hours(billed: f64, status: ProductionStatus, manual: Option<f64>) -> f64 {
    match manual {
        Some(hours) => hours,
        None => billed * multiplier(status),
    }
}

impl TimeEntry for LabourEntry {
    fn billed_hours(&self) -> f64 {
        (self.rt + self.ot) * f64::from(self.count)
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn status(&self) -> ProductionStatus {
        self.production_status
    }

    fn manual_shadow_hours(&self) -> Option<f64> {
        self.shadow_effective_hours
    }

    fn delay_reason(&self) -> Option<&str> {
        self.delay_reason.as_deref()
    }

    fn delay_note(&self) -> Option<&str> {
        self.delay_note.as_deref()
    }

    fn hourly_rate(&self, rates: &RateLookup) -> f64 {
        rates.labour_rate(&self.classification)
    }

    fn describe(&self) -> String {
        if self.classification.is_empty() {
            "labour entry".to_string()
        } else {
            format!("{} x{}", self.classification, self.count)
        }
    }
}

impl TimeEntry for EquipmentEntry {
    fn billed_hours(&self) -> f64 {
        self.hours * f64::from(self.count)
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn status(&self) -> ProductionStatus {
        self.production_status
    }

    fn manual_shadow_hours(&self) -> Option<f64> {
        self.shadow_effective_hours
    }

    fn delay_reason(&self) -> Option<&str> {
        self.delay_reason.as_deref()
    }

    fn delay_note(&self) -> Option<&str> {
        self.delay_note.as_deref()
    }

    fn hourly_rate(&self, rates: &RateLookup) -> f64 {
        rates.equipment_rate(&self.kind)
    }

    fn describe(&self) -> String {
        if self.kind.is_empty() {
            "equipment entry".to_string()
        } else {
            format!("{} x{}", self.kind, self.count)
        }
    }
}
