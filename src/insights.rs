use crate::errors::AggregateError;
use crate::models::{DailySummary, MetricAverages, MoodEntry, Period, RawTimestamp};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;

const MAX_DAYS: usize = 30;
const NEUTRAL_RATING: f64 = 3.0;
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

pub fn aggregate(entries: &[MoodEntry], period: Period) -> Result<Vec<DailySummary>, AggregateError> {
    aggregate_at(entries, period, Local::now())
}

/// Buckets `entries` by calendar day in the timezone of `now` and keeps the
/// days inside the trailing `period` window, oldest first, at most 30.
pub fn aggregate_at<Tz: TimeZone>(
    entries: &[MoodEntry],
    period: Period,
    now: DateTime<Tz>,
) -> Result<Vec<DailySummary>, AggregateError> {
    let tz = now.timezone();

    let mut timed = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        timed.push((entry_instant(entry, index, &tz)?, entry));
    }
    timed.sort_by_key(|(at, _)| *at);

    let mut days: BTreeMap<NaiveDate, Vec<&MoodEntry>> = BTreeMap::new();
    for (at, entry) in timed {
        let day = at.with_timezone(&tz).date_naive();
        days.entry(day).or_default().push(entry);
    }

    let cutoff = now - Duration::days(period.days());
    let mut series: Vec<DailySummary> = days
        .into_iter()
        .filter(|(day, _)| starts_on_or_after(*day, &cutoff))
        .map(|(day, members)| summarize_day(day, &members))
        .collect();

    if series.len() > MAX_DAYS {
        let excess = series.len() - MAX_DAYS;
        series.drain(..excess);
    }

    Ok(series)
}

/// Overall average of each metric across a series, as shown under the chart.
pub fn summarize(series: &[DailySummary]) -> Option<MetricAverages> {
    if series.is_empty() {
        return None;
    }

    let count = series.len() as f64;
    let mean = |field: fn(&DailySummary) -> f64| {
        round_one(series.iter().map(field).sum::<f64>() / count)
    };

    Some(MetricAverages {
        mood: mean(|day| day.mood),
        energy: mean(|day| day.energy),
        anxiety: mean(|day| day.anxiety),
        sleep: mean(|day| day.sleep),
        wellness: mean(|day| day.wellness),
    })
}

/// Mood, energy, inverted anxiety and sleep weighted equally.
pub fn wellness_score(mood: f64, energy: f64, anxiety: f64, sleep: f64) -> f64 {
    round_one((mood + energy + (6.0 - anxiety) + sleep) / 4.0)
}

/// Converts any supported timestamp shape to an instant. Values without an
/// offset are read as wall-clock time in `tz`.
pub fn normalize_timestamp<Tz: TimeZone>(raw: &RawTimestamp, tz: &Tz) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Wrapper {
            seconds,
            nanoseconds,
        } => DateTime::from_timestamp(*seconds, *nanoseconds),
        RawTimestamp::Millis(millis) => from_fractional_millis(*millis),
        RawTimestamp::Text(text) => parse_text(text.trim(), tz),
    }
}

/// A day is inside the window when its local midnight is not before `cutoff`.
fn starts_on_or_after<Tz: TimeZone>(day: NaiveDate, cutoff: &DateTime<Tz>) -> bool {
    let tz = cutoff.timezone();
    let start = day
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest());
    match start {
        Some(start) => start >= *cutoff,
        // midnight skipped by a DST jump
        None => day > cutoff.date_naive(),
    }
}

fn from_fractional_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let whole = millis.floor();
    let nanos = ((millis - whole) * 1_000_000.0).round() as i64;
    DateTime::from_timestamp_millis(whole as i64).map(|at| at + Duration::nanoseconds(nanos))
}

fn parse_text<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

fn entry_instant<Tz: TimeZone>(
    entry: &MoodEntry,
    index: usize,
    tz: &Tz,
) -> Result<DateTime<Utc>, AggregateError> {
    let invalid = |reason: String| AggregateError::InvalidEntry {
        record: entry.id.clone().unwrap_or_else(|| format!("#{index}")),
        reason,
    };

    if !entry.mood.is_finite() {
        return Err(invalid("mood is not a number".to_string()));
    }

    let raw = entry
        .timestamp
        .as_ref()
        .ok_or_else(|| invalid("missing timestamp".to_string()))?;

    normalize_timestamp(raw, tz).ok_or_else(|| invalid(format!("unparseable timestamp {raw:?}")))
}

fn summarize_day(day: NaiveDate, members: &[&MoodEntry]) -> DailySummary {
    let count = members.len() as f64;
    let mean = |field: fn(&MoodEntry) -> f64| {
        round_one(members.iter().map(|&entry| field(entry)).sum::<f64>() / count)
    };

    let mood = mean(|entry| entry.mood);
    let energy = mean(|entry| entry.energy.unwrap_or(NEUTRAL_RATING));
    let anxiety = mean(|entry| entry.anxiety.unwrap_or(NEUTRAL_RATING));
    let sleep = mean(|entry| entry.sleep.unwrap_or(NEUTRAL_RATING));

    DailySummary {
        date_key: day,
        display_label: day.format("%b %-d").to_string(),
        source_entries: members.iter().map(|&entry| entry.clone()).collect(),
        mood,
        energy,
        anxiety,
        sleep,
        wellness: wellness_score(mood, energy, anxiety, sleep),
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
