//! Delay reason taxonomy.
//!
//! Every reason an inspector can select for a non-productive status carries
//! who is accountable for it and how it interacts with block-wide delays.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsibleParty {
    Owner,
    Contractor,
    Neutral,
    Unknown,
}

impl ResponsibleParty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Contractor => "contractor",
            Self::Neutral => "neutral",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResponsibleParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonTraits {
    pub responsible_party: ResponsibleParty,
    /// Pre-selects the block-wide delay toggle when chosen.
    pub default_systemic: bool,
    /// Always block-wide; per-entry selection is not allowed.
    pub lock_systemic: bool,
    pub requires_note: bool,
}

const fn traits(
    responsible_party: ResponsibleParty,
    default_systemic: bool,
    lock_systemic: bool,
    requires_note: bool,
) -> ReasonTraits {
    ReasonTraits {
        responsible_party,
        default_systemic,
        lock_systemic,
        requires_note,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayReason {
    EnvironmentalWindow,
    ExtremeWeather,
    ForceMajeure,
    SafetyStandDown,
    LandownerAccess,
    PermitHold,
    OwnerDirectedStop,
    DesignChange,
    WaitingForMaterials,
    WaitingForInspection,
    EquipmentBreakdown,
    CrewShortage,
    PoorPlanning,
    Rework,
    WaitingOnOtherCrew,
    UtilityConflict,
    GroundConditions,
    Other,
}

impl DelayReason {
    pub const ALL: [DelayReason; 18] = [
        Self::EnvironmentalWindow,
        Self::ExtremeWeather,
        Self::ForceMajeure,
        Self::SafetyStandDown,
        Self::LandownerAccess,
        Self::PermitHold,
        Self::OwnerDirectedStop,
        Self::DesignChange,
        Self::WaitingForMaterials,
        Self::WaitingForInspection,
        Self::EquipmentBreakdown,
        Self::CrewShortage,
        Self::PoorPlanning,
        Self::Rework,
        Self::WaitingOnOtherCrew,
        Self::UtilityConflict,
        Self::GroundConditions,
        Self::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::EnvironmentalWindow => "environmental_window",
            Self::ExtremeWeather => "extreme_weather",
            Self::ForceMajeure => "force_majeure",
            Self::SafetyStandDown => "safety_stand_down",
            Self::LandownerAccess => "landowner_access",
            Self::PermitHold => "permit_hold",
            Self::OwnerDirectedStop => "owner_directed_stop",
            Self::DesignChange => "design_change",
            Self::WaitingForMaterials => "waiting_for_materials",
            Self::WaitingForInspection => "waiting_for_inspection",
            Self::EquipmentBreakdown => "equipment_breakdown",
            Self::CrewShortage => "crew_shortage",
            Self::PoorPlanning => "poor_planning",
            Self::Rework => "rework",
            Self::WaitingOnOtherCrew => "waiting_on_other_crew",
            Self::UtilityConflict => "utility_conflict",
            Self::GroundConditions => "ground_conditions",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EnvironmentalWindow => "Environmental window closure",
            Self::ExtremeWeather => "Extreme weather",
            Self::ForceMajeure => "Force majeure",
            Self::SafetyStandDown => "Safety stand-down",
            Self::LandownerAccess => "Landowner access restriction",
            Self::PermitHold => "Permit or regulatory hold",
            Self::OwnerDirectedStop => "Owner-directed stop",
            Self::DesignChange => "Design change / IFC revision",
            Self::WaitingForMaterials => "Waiting for owner-supplied materials",
            Self::WaitingForInspection => "Waiting for owner inspection",
            Self::EquipmentBreakdown => "Equipment breakdown",
            Self::CrewShortage => "Crew shortage",
            Self::PoorPlanning => "Poor sequencing / planning",
            Self::Rework => "Contractor rework",
            Self::WaitingOnOtherCrew => "Waiting on another crew",
            Self::UtilityConflict => "Unmarked utility conflict",
            Self::GroundConditions => "Unexpected ground conditions",
            Self::Other => "Other",
        }
    }

    pub fn traits(self) -> ReasonTraits {
        use ResponsibleParty::{Contractor, Neutral, Owner, Unknown};
        match self {
            Self::EnvironmentalWindow => traits(Neutral, true, true, false),
            Self::ExtremeWeather => traits(Neutral, true, true, false),
            Self::ForceMajeure => traits(Neutral, true, true, true),
            Self::SafetyStandDown => traits(Neutral, true, false, true),
            Self::LandownerAccess => traits(Owner, true, false, false),
            Self::PermitHold => traits(Owner, true, false, false),
            Self::OwnerDirectedStop => traits(Owner, true, false, true),
            Self::DesignChange => traits(Owner, false, false, true),
            Self::WaitingForMaterials => traits(Owner, false, false, false),
            Self::WaitingForInspection => traits(Owner, false, false, false),
            Self::EquipmentBreakdown => traits(Contractor, false, false, false),
            Self::CrewShortage => traits(Contractor, false, false, false),
            Self::PoorPlanning => traits(Contractor, false, false, false),
            Self::Rework => traits(Contractor, false, false, true),
            Self::WaitingOnOtherCrew => traits(Contractor, false, false, false),
            Self::UtilityConflict => traits(Neutral, false, false, true),
            Self::GroundConditions => traits(Neutral, false, false, false),
            Self::Other => traits(Unknown, false, false, true),
        }
    }

    /// Accepts the catalog key in any case, with spaces or hyphens in place
    /// of underscores.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|reason| reason.key() == normalized)
    }
}

/// One row of the reason catalog as listed to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub traits: ReasonTraits,
}

pub fn catalog() -> Vec<CatalogEntry> {
    DelayReason::ALL
        .into_iter()
        .map(|reason| CatalogEntry {
            key: reason.key(),
            label: reason.label(),
            traits: reason.traits(),
        })
        .collect()
}

/// Responsible party for a free-text reason key; anything outside the
/// catalog is `Unknown`.
pub fn responsible_party_for(key: Option<&str>) -> ResponsibleParty {
    key.and_then(DelayReason::from_key)
        .map(|reason| reason.traits().responsible_party)
        .unwrap_or(ResponsibleParty::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_lookup() {
        for reason in DelayReason::ALL {
            assert_eq!(DelayReason::from_key(reason.key()), Some(reason));
        }
    }

    #[test]
    fn lookup_tolerates_case_and_separators() {
        assert_eq!(
            DelayReason::from_key("Extreme Weather"),
            Some(DelayReason::ExtremeWeather)
        );
        assert_eq!(
            DelayReason::from_key("equipment-breakdown"),
            Some(DelayReason::EquipmentBreakdown)
        );
    }

    #[test]
    fn unknown_keys_resolve_to_unknown_party() {
        assert_eq!(responsible_party_for(Some("alien_abduction")), ResponsibleParty::Unknown);
        assert_eq!(responsible_party_for(None), ResponsibleParty::Unknown);
        assert_eq!(
            responsible_party_for(Some("landowner_access")),
            ResponsibleParty::Owner
        );
    }

    #[test]
    fn locked_reasons_are_systemic_by_default() {
        for reason in DelayReason::ALL {
            let traits = reason.traits();
            if traits.lock_systemic {
                assert!(traits.default_systemic, "{} locks but is not default", reason.key());
            }
        }
    }
}
