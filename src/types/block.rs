use super::activity::ActivityType;
use super::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    #[default]
    Active,
    SyncDelay,
    ManagementDrag,
    /// A status string this engine does not know.
    Unknown,
}

impl ProductionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "" | "ACTIVE" => Self::Active,
            "SYNC_DELAY" => Self::SyncDelay,
            "MANAGEMENT_DRAG" => Self::ManagementDrag,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::SyncDelay => "SYNC_DELAY",
            Self::ManagementDrag => "MANAGEMENT_DRAG",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Sync delay and management drag are the only delay states; unknown
    /// strings carry the neutral multiplier and are not counted as delays.
    pub fn is_delay(self) -> bool {
        matches!(self, Self::SyncDelay | Self::ManagementDrag)
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = lenient::text(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabourEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub classification: String,
    #[serde(default = "lenient::default_count", deserialize_with = "lenient::count")]
    pub count: u32,
    #[serde(default, deserialize_with = "lenient::hours")]
    pub rt: f64,
    #[serde(default, deserialize_with = "lenient::hours")]
    pub ot: f64,
    #[serde(default)]
    pub production_status: ProductionStatus,
    #[serde(default, deserialize_with = "lenient::override_hours")]
    pub shadow_effective_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub delay_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub delay_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentEntry {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default = "lenient::default_count", deserialize_with = "lenient::count")]
    pub count: u32,
    #[serde(default, deserialize_with = "lenient::hours")]
    pub hours: f64,
    #[serde(default)]
    pub production_status: ProductionStatus,
    #[serde(default, deserialize_with = "lenient::override_hours")]
    pub shadow_effective_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub delay_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub delay_note: Option<String>,
}

impl Default for LabourEntry {
    fn default() -> Self {
        Self {
            classification: String::new(),
            count: lenient::default_count(),
            rt: 0.0,
            ot: 0.0,
            production_status: ProductionStatus::Active,
            shadow_effective_hours: None,
            delay_reason: None,
            delay_note: None,
        }
    }
}

impl Default for EquipmentEntry {
    fn default() -> Self {
        Self {
            kind: String::new(),
            count: lenient::default_count(),
            hours: 0.0,
            production_status: ProductionStatus::Active,
            shadow_effective_hours: None,
            delay_reason: None,
            delay_note: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemicDelay {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: bool,
    #[serde(default)]
    pub status: ProductionStatus,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub note: Option<String>,
}

impl SystemicDelay {
    /// Block-wide delays only take over when switched on with a non-active
    /// status.
    pub fn overrides_entries(&self) -> bool {
        self.active && self.status != ProductionStatus::Active
    }
}

/// Drilling waste volumes (m³) tracked for Directive 050 reporting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteData {
    #[serde(default, alias = "totalVolumeMixed", deserialize_with = "lenient::hours")]
    pub total_mixed: f64,
    #[serde(default, alias = "volumeHauled", deserialize_with = "lenient::hours")]
    pub hauled: f64,
    #[serde(default, alias = "volumeStored", deserialize_with = "lenient::hours")]
    pub stored: f64,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub disposal_facility: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub additives: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    #[serde(default, deserialize_with = "lenient::hours")]
    pub inspected: f64,
    #[serde(default, deserialize_with = "lenient::hours")]
    pub rejected: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReworkItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBlock {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub activity_type: ActivityType,
    #[serde(
        rename = "startKP",
        alias = "startKp",
        default,
        deserialize_with = "lenient::optional_text"
    )]
    pub start_kp: Option<String>,
    #[serde(
        rename = "endKP",
        alias = "endKp",
        default,
        deserialize_with = "lenient::optional_text"
    )]
    pub end_kp: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub labour_entries: Vec<LabourEntry>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub equipment_entries: Vec<EquipmentEntry>,
    #[serde(default, deserialize_with = "quality_map")]
    pub quality_data: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub work_photos: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::optional_struct")]
    pub systemic_delay: Option<SystemicDelay>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub chainage_overlap_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub chainage_gap_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_struct")]
    pub waste_data: Option<WasteData>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub planned_metres: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub metres_completed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_struct")]
    pub inspection: Option<Inspection>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub rework: Vec<ReworkItem>,
}

fn quality_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}

impl ActivityBlock {
    /// The block-wide delay, when it overrides entry statuses.
    pub fn overriding_delay(&self) -> Option<&SystemicDelay> {
        self.systemic_delay
            .as_ref()
            .filter(|delay| delay.overrides_entries())
    }

    pub fn photo_count(&self) -> usize {
        self.work_photos
            .iter()
            .filter(|photo| lenient::is_filled(photo))
            .count()
    }

    pub fn kp_range(&self) -> String {
        format!(
            "{}-{}",
            self.start_kp.as_deref().unwrap_or("?"),
            self.end_kp.as_deref().unwrap_or("?")
        )
    }

    /// Short identification for issue strings.
    pub fn describe(&self) -> String {
        let activity = if self.activity_type.is_specified() {
            self.activity_type.label()
        } else {
            "Unclassified block"
        };
        format!("{activity} (KP {})", self.kp_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_deserializes_from_sparse_form_export() {
        let block: ActivityBlock = serde_json::from_value(json!({
            "activityType": "Lower-in",
            "startKP": "12+500",
            "labourEntries": [
                { "classification": "Labourer", "rt": "8", "ot": null, "count": "" }
            ],
            "equipmentEntries": null,
            "qualityData": null,
            "systemicDelay": { "active": true, "status": "management_drag", "reason": "extreme_weather" }
        }))
        .expect("block should parse");

        assert_eq!(block.activity_type, ActivityType::LowerIn);
        assert_eq!(block.labour_entries[0].rt, 8.0);
        assert_eq!(block.labour_entries[0].ot, 0.0);
        assert_eq!(block.labour_entries[0].count, 1);
        assert!(block.equipment_entries.is_empty());
        assert!(block.quality_data.is_empty());
        assert!(block.overriding_delay().is_some());
        assert_eq!(block.end_kp, None);
    }

    #[test]
    fn blank_sections_and_null_rows_do_not_reject_the_block() {
        let block: ActivityBlock = serde_json::from_value(json!({
            "activityType": "HDD",
            "systemicDelay": false,
            "wasteData": "",
            "inspection": "",
            "labourEntries": [null, { "classification": "Driller", "rt": 10 }],
            "equipmentEntries": ["", { "type": "Drill Rig", "hours": 10 }]
        }))
        .expect("block should parse");

        assert_eq!(block.systemic_delay, None);
        assert_eq!(block.waste_data, None);
        assert_eq!(block.inspection, None);
        assert_eq!(block.labour_entries.len(), 1);
        assert_eq!(block.labour_entries[0].classification, "Driller");
        assert_eq!(block.equipment_entries.len(), 1);
    }

    #[test]
    fn unknown_status_is_not_a_delay() {
        assert_eq!(ProductionStatus::parse("STANDBY"), ProductionStatus::Unknown);
        assert!(!ProductionStatus::Unknown.is_delay());
        assert_eq!(ProductionStatus::parse(""), ProductionStatus::Active);
        assert!(ProductionStatus::parse("Sync Delay").is_delay());
    }

    #[test]
    fn systemic_delay_with_active_status_does_not_override() {
        let delay = SystemicDelay {
            active: true,
            status: ProductionStatus::Active,
            reason: None,
            note: None,
        };
        assert!(!delay.overrides_entries());
    }
}
