use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Timestamp as it arrives from the entry source.
///
/// Entries written by the hosted data source carry a `{seconds, nanoseconds}`
/// wrapper; older exports carry epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Wrapper {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Millis(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    pub mood: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anxiety: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One calendar day of entries plus its derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date_key: NaiveDate,
    pub display_label: String,
    pub source_entries: Vec<MoodEntry>,
    pub mood: f64,
    pub energy: f64,
    pub anxiety: f64,
    pub sleep: f64,
    pub wellness: f64,
}

/// Trailing window used to filter daily summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Period {
    #[default]
    Week,
    Month,
    Quarter,
}

impl Period {
    /// Unrecognized names fall back to `Week`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Period::Month,
            "quarter" => Period::Quarter,
            _ => Period::Week,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }
}

impl From<String> for Period {
    fn from(value: String) -> Self {
        Period::parse(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    pub mood: f64,
    pub energy: f64,
    pub anxiety: f64,
    pub sleep: f64,
    pub wellness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub default_period: Period,
    pub reminders_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub mood: u8,
    pub energy: Option<u8>,
    pub anxiety: Option<u8>,
    pub sleep: Option<u8>,
    pub note: Option<String>,
    pub timestamp: Option<RawTimestamp>,
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub period: Period,
    pub days: Vec<DailySummary>,
    pub averages: Option<MetricAverages>,
}

#[derive(Debug, Serialize)]
pub struct LoggedMoodResponse {
    pub entry: MoodEntry,
    pub toast: crate::toast::Toast,
}

#[derive(Debug, Serialize)]
pub struct StorageStatusResponse {
    pub available: bool,
    pub used_bytes: usize,
    pub cleared: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_falls_back_to_week() {
        assert_eq!(Period::parse("month"), Period::Month);
        assert_eq!(Period::parse(" Quarter "), Period::Quarter);
        assert_eq!(Period::parse("fortnight"), Period::Week);
        assert_eq!(Period::parse(""), Period::Week);

        let parsed: Period = serde_json::from_str("\"year\"").unwrap();
        assert_eq!(parsed, Period::Week);
    }

    #[test]
    fn timestamp_shapes_deserialize() {
        let wrapper: RawTimestamp =
            serde_json::from_str(r#"{"seconds": 1700000000, "nanoseconds": 5}"#).unwrap();
        assert_eq!(
            wrapper,
            RawTimestamp::Wrapper {
                seconds: 1_700_000_000,
                nanoseconds: 5
            }
        );

        let millis: RawTimestamp = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(millis, RawTimestamp::Millis(1_700_000_000_000.0));

        let fractional: RawTimestamp = serde_json::from_str("1.7e12").unwrap();
        assert_eq!(fractional, RawTimestamp::Millis(1.7e12));

        let cached: MoodEntry =
            serde_json::from_str(r#"{"timestamp": 1700000000000.25, "mood": 3}"#).unwrap();
        assert_eq!(cached.timestamp, Some(RawTimestamp::Millis(1_700_000_000_000.25)));

        let text: RawTimestamp = serde_json::from_str("\"2026-01-05\"").unwrap();
        assert_eq!(text, RawTimestamp::Text("2026-01-05".to_string()));
    }

    #[test]
    fn entry_without_timestamp_still_deserializes() {
        let entry: MoodEntry = serde_json::from_str(r#"{"mood": 4}"#).unwrap();
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.energy, None);
    }
}
