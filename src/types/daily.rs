use super::block::ActivityBlock;
use super::lenient;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
    Overridden,
    Resolved,
}

impl AlertStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "acknowledged" => Self::Acknowledged,
            "overridden" => Self::Overridden,
            "resolved" => Self::Resolved,
            _ => Self::Active,
        }
    }

    pub fn is_addressed(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl<'de> Deserialize<'de> for AlertStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = lenient::text(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Advisory raised by the inspector mentor while the report was written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorAlert {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub message: Option<String>,
}

/// One inspector's daily report, as exported by the reporting app.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "report_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub spread: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub inspector: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub health_threshold: Option<f64>,
    #[serde(default, alias = "activityBlocks", deserialize_with = "lenient::list")]
    pub blocks: Vec<ActivityBlock>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub mentor_alerts: Vec<MentorAlert>,
    /// File (and array position) the report was loaded from.
    #[serde(skip)]
    pub source: Option<String>,
}

impl DailyReport {
    pub fn label(&self) -> String {
        let id = self.id.as_deref().unwrap_or("unnamed report");
        match self.date {
            Some(date) => format!("{id} ({date})"),
            None => id.to_string(),
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full timestamp; anything else is "undated".
fn report_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(parse_date))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
