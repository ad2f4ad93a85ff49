//! Activity types and the quality-data fields each one must document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    /// Derived by the form from other inputs; never counted as required.
    pub calculated: bool,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        calculated: false,
    }
}

const fn calculated(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        calculated: true,
    }
}

const CLEARING_FIELDS: &[FieldSpec] = &[
    field("clearingWidth", "Clearing width"),
    field("boundariesVerified", "ROW boundaries verified"),
    field("timberSalvage", "Timber salvage method"),
];

const GRADING_FIELDS: &[FieldSpec] = &[
    field("gradingWidth", "Grading width"),
    field("topsoilStripDepth", "Topsoil strip depth"),
    field("topsoilSeparated", "Topsoil separated"),
    field("soilConditions", "Soil conditions"),
    calculated("topsoilVolume", "Topsoil volume"),
];

const ACCESS_FIELDS: &[FieldSpec] = &[
    field("accessType", "Access type"),
    field("roadCondition", "Road condition"),
    field("signagePosted", "Signage posted"),
];

const STRINGING_FIELDS: &[FieldSpec] = &[
    field("jointsStrung", "Joints strung"),
    field("heatNumbersRecorded", "Heat numbers recorded"),
    field("skidSpacing", "Skid spacing"),
];

const BENDING_FIELDS: &[FieldSpec] = &[
    field("bendsCompleted", "Bends completed"),
    field("bendAngleVerified", "Bend angle verified"),
    field("ovalityChecked", "Ovality checked"),
];

const WELDING_FIELDS: &[FieldSpec] = &[
    field("weldsCompleted", "Welds completed"),
    field("weldProcedure", "Weld procedure (WPS)"),
    field("preheatVerified", "Preheat verified"),
    field("visualInspection", "Visual inspection"),
    calculated("weldsPerHour", "Welds per hour"),
];

const COATING_FIELDS: &[FieldSpec] = &[
    field("coatingProduct", "Coating product"),
    field("ambientTemperature", "Ambient temperature"),
    field("surfacePrep", "Surface preparation"),
    field("holidayTestVoltage", "Holiday test voltage"),
    calculated("averageDft", "Average DFT"),
];

const DITCH_FIELDS: &[FieldSpec] = &[
    field("ditchDepth", "Ditch depth"),
    field("ditchWidth", "Ditch width"),
    field("minimumCover", "Minimum cover"),
    field("groundwaterControl", "Groundwater control"),
];

const LOWER_IN_FIELDS: &[FieldSpec] = &[
    field("paddingMaterial", "Padding material"),
    field("holidayDetection", "Holiday detection before lowering"),
    field("depthOfCover", "Depth of cover"),
    field("sidebooms", "Sidebooms used"),
];

const BACKFILL_FIELDS: &[FieldSpec] = &[
    field("backfillMaterial", "Backfill material"),
    field("compactionMethod", "Compaction method"),
    field("crownHeight", "Crown height"),
];

const TIE_IN_FIELDS: &[FieldSpec] = &[
    field("tieInWelds", "Tie-in welds"),
    field("ndtMethod", "NDT method"),
    field("fitUpVerified", "Fit-up verified"),
];

const HYDRO_TEST_FIELDS: &[FieldSpec] = &[
    field("testPressure", "Test pressure"),
    field("holdDuration", "Hold duration"),
    field("testMedium", "Test medium"),
    calculated("pressureDrop", "Pressure drop"),
];

const HD_BORE_FIELDS: &[FieldSpec] = &[
    field("boreLength", "Bore length"),
    field("casingInstalled", "Casing installed"),
    field("entryPitDepth", "Entry pit depth"),
];

const HDD_FIELDS: &[FieldSpec] = &[
    field("pilotHoleComplete", "Pilot hole complete"),
    field("reamPasses", "Ream passes"),
    field("drillingFluid", "Drilling fluid"),
    field("pullbackComplete", "Pullback complete"),
];

const CLEAN_UP_FIELDS: &[FieldSpec] = &[
    field("debrisRemoved", "Debris removed"),
    field("seeded", "Reclamation seeded"),
    field("fencesRestored", "Fences restored"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Clearing,
    Grading,
    Access,
    Stringing,
    Bending,
    Welding,
    Coating,
    Ditch,
    LowerIn,
    Backfill,
    TieIn,
    HydroTest,
    HdBores,
    Hdd,
    CleanUp,
    /// A label outside the catalog, kept verbatim so it can be reported.
    Unrecognized(String),
    /// Blank activity type: the block was started but never classified.
    Unspecified,
}

impl ActivityType {
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "" => Self::Unspecified,
            "clearing" => Self::Clearing,
            "grading" => Self::Grading,
            "access" | "accessroads" => Self::Access,
            "stringing" => Self::Stringing,
            "bending" => Self::Bending,
            "welding" | "weldingmainline" | "mainlinewelding" => Self::Welding,
            "coating" | "fieldcoating" => Self::Coating,
            "ditch" | "ditching" => Self::Ditch,
            "lowerin" | "loweringin" => Self::LowerIn,
            "backfill" | "backfilling" => Self::Backfill,
            "tiein" | "tieins" => Self::TieIn,
            "hydrotest" | "hydrostatictesting" | "hydrotesting" => Self::HydroTest,
            "hdbores" | "hdbore" => Self::HdBores,
            "hdd" | "horizontaldirectionaldrilling" => Self::Hdd,
            "cleanup" => Self::CleanUp,
            _ => Self::Unrecognized(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Clearing => "Clearing",
            Self::Grading => "Grading",
            Self::Access => "Access",
            Self::Stringing => "Stringing",
            Self::Bending => "Bending",
            Self::Welding => "Welding - Mainline",
            Self::Coating => "Coating",
            Self::Ditch => "Ditch",
            Self::LowerIn => "Lower-in",
            Self::Backfill => "Backfill",
            Self::TieIn => "Tie-in",
            Self::HydroTest => "Hydrostatic Testing",
            Self::HdBores => "HD Bores",
            Self::Hdd => "HDD",
            Self::CleanUp => "Clean-up",
            Self::Unrecognized(label) => label,
            Self::Unspecified => "",
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }

    /// Work buried or covered by the end of the day; only photos prove it.
    pub fn is_concealed_work(&self) -> bool {
        matches!(
            self,
            Self::LowerIn | Self::Backfill | Self::Coating | Self::HdBores | Self::Hdd
        )
    }

    pub fn is_drilling(&self) -> bool {
        matches!(self, Self::HdBores | Self::Hdd)
    }

    /// `None` when the activity has no field catalog.
    pub fn field_catalog(&self) -> Option<&'static [FieldSpec]> {
        let fields = match self {
            Self::Clearing => CLEARING_FIELDS,
            Self::Grading => GRADING_FIELDS,
            Self::Access => ACCESS_FIELDS,
            Self::Stringing => STRINGING_FIELDS,
            Self::Bending => BENDING_FIELDS,
            Self::Welding => WELDING_FIELDS,
            Self::Coating => COATING_FIELDS,
            Self::Ditch => DITCH_FIELDS,
            Self::LowerIn => LOWER_IN_FIELDS,
            Self::Backfill => BACKFILL_FIELDS,
            Self::TieIn => TIE_IN_FIELDS,
            Self::HydroTest => HYDRO_TEST_FIELDS,
            Self::HdBores => HD_BORE_FIELDS,
            Self::Hdd => HDD_FIELDS,
            Self::CleanUp => CLEAN_UP_FIELDS,
            Self::Unrecognized(_) | Self::Unspecified => return None,
        };
        Some(fields)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.field_catalog()
            .unwrap_or_default()
            .iter()
            .filter(|spec| !spec.calculated)
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = super::lenient::text(deserializer)?;
        Ok(Self::parse(&label))
    }
}

impl Serialize for ActivityType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_form_labels_and_aliases() {
        assert_eq!(ActivityType::parse("Lower-in"), ActivityType::LowerIn);
        assert_eq!(ActivityType::parse("HD Bores"), ActivityType::HdBores);
        assert_eq!(ActivityType::parse("hdd"), ActivityType::Hdd);
        assert_eq!(
            ActivityType::parse("Welding - Mainline"),
            ActivityType::Welding
        );
        assert_eq!(ActivityType::parse("  "), ActivityType::Unspecified);
    }

    #[test]
    fn unknown_labels_are_kept_for_reporting() {
        let parsed = ActivityType::parse("Gradding");
        assert_eq!(parsed, ActivityType::Unrecognized("Gradding".to_string()));
        assert!(parsed.field_catalog().is_none());
        assert!(parsed.is_specified());
    }

    #[test]
    fn concealed_and_drilling_sets() {
        assert!(ActivityType::Hdd.is_concealed_work());
        assert!(ActivityType::Hdd.is_drilling());
        assert!(ActivityType::Backfill.is_concealed_work());
        assert!(!ActivityType::Backfill.is_drilling());
        assert!(!ActivityType::Grading.is_concealed_work());
    }

    #[test]
    fn required_fields_skip_calculated_entries() {
        let keys: Vec<_> = ActivityType::Grading
            .required_fields()
            .map(|spec| spec.key)
            .collect();
        assert!(keys.contains(&"gradingWidth"));
        assert!(!keys.contains(&"topsoilVolume"));
    }
}
