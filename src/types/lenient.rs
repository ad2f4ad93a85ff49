//! Forgiving field parsers for report exports.
//!
//! Field data arrives from forms: numbers may be JSON numbers, numeric
//! strings, empty strings or null. None of these are errors here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

/// Hours and volumes: malformed or negative values become 0.
pub fn hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(parse_number)
        .map(|number| number.max(0.0))
        .unwrap_or(0.0))
}

/// Headcount: defaults to 1 when missing, non-numeric or not positive.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_count).unwrap_or(1))
}

pub fn parse_count(value: &Value) -> u32 {
    match parse_number(value).map(f64::trunc) {
        Some(number) if number >= 1.0 => number.min(f64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

pub fn default_count() -> u32 {
    1
}

/// Manual shadow-hour override. Absent or null means "no override"; any
/// other value is an override, and an unparsable one counts as 0.
pub fn override_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(other) => Some(parse_number(&other).unwrap_or(0.0)),
    })
}

/// Optional measurement: null or unparsable means "not recorded".
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_number))
}

/// Optional free text: blank strings collapse to `None`, numbers are kept
/// as their textual form.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Free text that defaults to an empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Option::unwrap_or_default)
}

/// Arrays that may be null or blank in older exports. Elements that do not
/// fit `T` (a `null` row, a stray string) are dropped, not the whole record.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::debug!(error = %err, "dropping malformed list element");
                None
            }
        })
        .collect())
}

/// Optional nested section: anything other than an object that parses
/// (`""`, `false`, `null`) means the section was not filled in.
pub fn optional_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => matches!(text.trim(), "true" | "yes" | "1"),
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        _ => false,
    })
}

/// Whether a form value counts as answered. `false` and `0` are answers;
/// blanks, nulls and empty collections are not.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => items.iter().any(is_filled),
        Value::Object(map) => map.values().any(is_filled),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "hours")]
        rt: f64,
        #[serde(default = "default_count", deserialize_with = "count")]
        count: u32,
        #[serde(default, deserialize_with = "override_hours")]
        manual: Option<f64>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "hours")]
        hours: f64,
    }

    #[derive(Deserialize)]
    struct Sheet {
        #[serde(default, deserialize_with = "list")]
        rows: Vec<Row>,
        #[serde(default, deserialize_with = "optional_struct")]
        section: Option<Row>,
    }

    fn sheet(value: serde_json::Value) -> Sheet {
        serde_json::from_value(value).expect("sheet should deserialize")
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).expect("sample should deserialize")
    }

    #[test]
    fn hours_accept_numeric_strings_and_default_garbage_to_zero() {
        assert_eq!(sample(json!({ "rt": "7.5" })).rt, 7.5);
        assert_eq!(sample(json!({ "rt": "abc" })).rt, 0.0);
        assert_eq!(sample(json!({ "rt": null })).rt, 0.0);
        assert_eq!(sample(json!({ "rt": -4 })).rt, 0.0);
        assert_eq!(sample(json!({})).rt, 0.0);
    }

    #[test]
    fn count_defaults_to_one() {
        assert_eq!(sample(json!({})).count, 1);
        assert_eq!(sample(json!({ "count": "crew" })).count, 1);
        assert_eq!(sample(json!({ "count": 0 })).count, 1);
        assert_eq!(sample(json!({ "count": "3" })).count, 3);
        assert_eq!(sample(json!({ "count": 2.9 })).count, 2);
    }

    #[test]
    fn override_distinguishes_null_from_unparsable() {
        assert_eq!(sample(json!({})).manual, None);
        assert_eq!(sample(json!({ "manual": null })).manual, None);
        assert_eq!(sample(json!({ "manual": "" })).manual, Some(0.0));
        assert_eq!(sample(json!({ "manual": "4.25" })).manual, Some(4.25));
    }

    #[test]
    fn filled_values_include_false_and_zero() {
        assert!(is_filled(&json!(false)));
        assert!(is_filled(&json!(0)));
        assert!(is_filled(&json!(["bentonite"])));
        assert!(!is_filled(&json!("  ")));
        assert!(!is_filled(&json!([])));
        assert!(!is_filled(&json!({ "name": "" })));
    }

    #[test]
    fn list_drops_rows_that_are_not_records() {
        let parsed = sheet(json!({ "rows": [null, { "hours": 3 }, "n/a", 7] }));
        assert_eq!(parsed.rows, vec![Row { hours: 3.0 }]);
        assert!(sheet(json!({ "rows": "" })).rows.is_empty());
        assert!(sheet(json!({ "rows": null })).rows.is_empty());
    }

    #[test]
    fn blank_sections_read_as_absent() {
        for blank in [json!(""), json!(false), json!(null), json!([]), json!(0)] {
            assert_eq!(sheet(json!({ "section": blank })).section, None);
        }
        assert_eq!(
            sheet(json!({ "section": { "hours": "2" } })).section,
            Some(Row { hours: 2.0 })
        );
    }
}
