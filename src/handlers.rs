use crate::errors::{AppError, StorageError};
use crate::insights::{aggregate, normalize_timestamp, summarize};
use crate::models::{
    InsightsQuery, InsightsResponse, LoggedMoodResponse, MoodEntry, MoodRequest, Period,
    RawTimestamp, StorageStatusResponse, UserPreferences,
};
use crate::state::AppState;
use crate::storage::{Storage, StorageKey};
use crate::store::{KeyValueStore, MemoryStore, persist_snapshot};
use crate::toast::{Toast, ToastKind};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use chrono::{Local, Utc};
use tracing::{error, info, warn};

/// Oldest entries are dropped past this many.
const MAX_CACHED_ENTRIES: usize = 1000;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let storage = state.storage.lock().await;
    let entries: Vec<MoodEntry> = storage.get(StorageKey::RecentMoods, Vec::new());
    Html(render_index(&today_string(), entries.len()))
}

pub async fn list_moods(State(state): State<AppState>) -> Json<Vec<MoodEntry>> {
    let storage = state.storage.lock().await;
    Json(storage.get(StorageKey::RecentMoods, Vec::new()))
}

pub async fn log_mood(
    State(state): State<AppState>,
    Json(payload): Json<MoodRequest>,
) -> Result<Json<LoggedMoodResponse>, AppError> {
    validate_rating("mood", Some(payload.mood))?;
    validate_rating("energy", payload.energy)?;
    validate_rating("anxiety", payload.anxiety)?;
    validate_rating("sleep", payload.sleep)?;

    let timestamp = match payload.timestamp {
        Some(raw) => {
            if normalize_timestamp(&raw, &Local).is_none() {
                return Err(AppError::bad_request("timestamp is not a recognizable date"));
            }
            raw
        }
        None => RawTimestamp::Text(Utc::now().to_rfc3339()),
    };

    let entry = MoodEntry {
        id: Some(format!("mood-{}", Utc::now().timestamp_micros())),
        timestamp: Some(timestamp),
        mood: f64::from(payload.mood),
        energy: payload.energy.map(f64::from),
        anxiety: payload.anxiety.map(f64::from),
        sleep: payload.sleep.map(f64::from),
        note: payload.note.filter(|note| !note.trim().is_empty()),
    };

    let mut storage = state.storage.lock().await;
    let toast = if let Err(err) = append_entry(&mut *storage, entry.clone()) {
        warn!("mood cache left untouched: {err}");
        Toast::error("Couldn't save your check-in")
    } else if flush(&state, &storage).await {
        info!(mood = entry.mood, "mood logged");
        Toast::success("Mood logged")
    } else {
        Toast::new(ToastKind::Warning, "Mood logged for this session only")
    };

    Ok(Json(LoggedMoodResponse { entry, toast }))
}

pub async fn get_insights(
    State(state): State<AppState>,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<InsightsResponse>, AppError> {
    let (period, entries) = {
        let storage = state.storage.lock().await;
        let period = match query.period.as_deref() {
            Some(name) => Period::parse(name),
            None => {
                storage
                    .get(StorageKey::UserPreferences, UserPreferences::default())
                    .default_period
            }
        };
        let entries: Vec<MoodEntry> = storage.get(StorageKey::RecentMoods, Vec::new());
        (period, entries)
    };

    let days = aggregate(&entries, period)?;
    let averages = summarize(&days);

    Ok(Json(InsightsResponse {
        period,
        days,
        averages,
    }))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<UserPreferences> {
    let storage = state.storage.lock().await;
    Json(storage.get(StorageKey::UserPreferences, UserPreferences::default()))
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<UserPreferences>,
) -> Json<UserPreferences> {
    let mut storage = state.storage.lock().await;
    let saved = storage.set(StorageKey::UserPreferences, &preferences)
        && storage.set(StorageKey::Theme, &preferences.theme);
    if saved {
        flush(&state, &storage).await;
    }
    Json(preferences)
}

pub async fn storage_status(State(state): State<AppState>) -> Json<StorageStatusResponse> {
    let mut storage = state.storage.lock().await;
    let usage = storage.usage_info();
    Json(StorageStatusResponse {
        available: usage.available,
        used_bytes: usage.used_bytes,
        cleared: None,
    })
}

pub async fn clear_storage(State(state): State<AppState>) -> Json<StorageStatusResponse> {
    let mut storage = state.storage.lock().await;
    let cleared = storage.clear_namespace();
    if cleared {
        info!("storage namespace cleared");
        flush(&state, &storage).await;
    }

    let usage = storage.usage_info();
    Json(StorageStatusResponse {
        available: usage.available,
        used_bytes: usage.used_bytes,
        cleared: Some(cleared),
    })
}

/// Appends to the cached entries. An undecodable cache is left as is rather
/// than replaced by the single new entry.
fn append_entry<S: KeyValueStore>(
    storage: &mut Storage<S>,
    entry: MoodEntry,
) -> Result<(), StorageError> {
    let mut entries: Vec<MoodEntry> = storage
        .try_get(StorageKey::RecentMoods)?
        .unwrap_or_default();

    entries.push(entry);
    if entries.len() > MAX_CACHED_ENTRIES {
        let excess = entries.len() - MAX_CACHED_ENTRIES;
        entries.drain(..excess);
    }

    storage.try_set(StorageKey::RecentMoods, &entries)
}

fn validate_rating(field: &str, value: Option<u8>) -> Result<(), AppError> {
    match value {
        Some(rating) if !(1..=5).contains(&rating) => Err(AppError::bad_request(format!(
            "{field} must be between 1 and 5"
        ))),
        _ => Ok(()),
    }
}

/// Writes the store snapshot to disk; failures only cost durability.
async fn flush(state: &AppState, storage: &Storage<MemoryStore>) -> bool {
    match persist_snapshot(&state.data_path, storage.store().items()).await {
        Ok(()) => true,
        Err(err) => {
            error!("failed to persist snapshot: {err}");
            false
        }
    }
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn entry(id: &str) -> MoodEntry {
        MoodEntry {
            id: Some(id.to_string()),
            timestamp: Some(RawTimestamp::Text("2026-01-05T09:00:00Z".to_string())),
            mood: 3.0,
            energy: None,
            anxiety: None,
            sleep: None,
            note: None,
        }
    }

    #[test]
    fn append_entry_extends_the_cache() {
        let mut storage = Storage::new(MemoryStore::default());
        append_entry(&mut storage, entry("a")).unwrap();
        append_entry(&mut storage, entry("b")).unwrap();

        let cached: Vec<MoodEntry> = storage.get(StorageKey::RecentMoods, Vec::new());
        let ids: Vec<_> = cached.iter().filter_map(|entry| entry.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn append_entry_keeps_newest_entries() {
        let mut storage = Storage::new(MemoryStore::default());
        let full: Vec<MoodEntry> = (0..MAX_CACHED_ENTRIES)
            .map(|index| entry(&format!("old-{index}")))
            .collect();
        assert!(storage.set(StorageKey::RecentMoods, &full));

        append_entry(&mut storage, entry("new")).unwrap();
        let cached: Vec<MoodEntry> = storage.get(StorageKey::RecentMoods, Vec::new());
        assert_eq!(cached.len(), MAX_CACHED_ENTRIES);
        assert_eq!(cached[0].id.as_deref(), Some("old-1"));
        assert_eq!(cached.last().unwrap().id.as_deref(), Some("new"));
    }

    #[test]
    fn append_entry_refuses_to_overwrite_a_corrupt_cache() {
        let mut items = BTreeMap::new();
        items.insert(
            StorageKey::RecentMoods.as_str().to_string(),
            "[{\"mood\": ".to_string(),
        );
        let mut storage = Storage::new(MemoryStore::new(items, None));

        let err = append_entry(&mut storage, entry("new")).unwrap_err();
        assert!(matches!(err, StorageError::Codec(_)));
        assert_eq!(
            storage
                .store()
                .items()
                .get(StorageKey::RecentMoods.as_str())
                .map(String::as_str),
            Some("[{\"mood\": ")
        );
    }
}
