use crate::errors::StorageError;
use crate::store::{KeyValueStore, utf16_bytes};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// Prefix shared by every key this application writes.
pub const KEY_PREFIX: &str = "mood_journal_";

const PROBE_KEY: &str = "mood_journal___probe__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    AuthState,
    UserPreferences,
    Theme,
    OnboardingComplete,
    RecentMoods,
    DraftPost,
    NotificationSettings,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::AuthState => "mood_journal_auth",
            StorageKey::UserPreferences => "mood_journal_preferences",
            StorageKey::Theme => "mood_journal_theme",
            StorageKey::OnboardingComplete => "mood_journal_onboarding_complete",
            StorageKey::RecentMoods => "mood_journal_recent_moods",
            StorageKey::DraftPost => "mood_journal_draft_post",
            StorageKey::NotificationSettings => "mood_journal_notification_settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageInfo {
    pub used_bytes: usize,
    pub available: bool,
}

/// Typed access to an untrusted key-value store.
///
/// Public operations never fail: reads fall back to the caller's default and
/// writes report `false`, with a warning logged. The `try_*` forms expose
/// the underlying error.
#[derive(Debug)]
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, StorageError> {
        match self.store.get_item(key.as_str())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn try_set<T: Serialize>(&mut self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set_item(key.as_str(), &raw)
    }

    pub fn try_clear_namespace(&mut self) -> Result<usize, StorageError> {
        let owned: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(KEY_PREFIX))
            .collect();

        for key in &owned {
            self.store.remove_item(key)?;
        }
        Ok(owned.len())
    }

    pub fn try_usage(&self) -> Result<usize, StorageError> {
        let mut used = 0;
        for key in self.store.keys()? {
            let value = self.store.get_item(&key)?.unwrap_or_default();
            used += utf16_bytes(&key) + utf16_bytes(&value);
        }
        Ok(used)
    }

    pub fn get<T: DeserializeOwned>(&self, key: StorageKey, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!(key = key.as_str(), "failed to read stored value: {err}");
                default
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: StorageKey, value: &T) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(err @ StorageError::QuotaExceeded { .. }) => {
                warn!(key = key.as_str(), "storage quota exceeded: {err}");
                false
            }
            Err(err) => {
                warn!(key = key.as_str(), "failed to store value: {err}");
                false
            }
        }
    }

    pub fn remove(&mut self, key: StorageKey) -> bool {
        match self.store.remove_item(key.as_str()) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = key.as_str(), "failed to remove stored value: {err}");
                false
            }
        }
    }

    /// Removes every key under [`KEY_PREFIX`], leaving other tenants' keys.
    pub fn clear_namespace(&mut self) -> bool {
        match self.try_clear_namespace() {
            Ok(_) => true,
            Err(err) => {
                warn!("failed to clear storage namespace: {err}");
                false
            }
        }
    }

    pub fn is_available(&mut self) -> bool {
        let probe = self
            .store
            .set_item(PROBE_KEY, PROBE_KEY)
            .and_then(|()| self.store.remove_item(PROBE_KEY));
        match probe {
            Ok(()) => true,
            Err(err) => {
                warn!("storage is not available: {err}");
                false
            }
        }
    }

    /// Approximate; values are counted at two bytes per UTF-16 unit.
    pub fn usage_info(&mut self) -> UsageInfo {
        match self.try_usage() {
            Ok(used_bytes) => UsageInfo {
                used_bytes,
                available: self.is_available(),
            },
            Err(err) => {
                warn!("failed to measure storage usage: {err}");
                UsageInfo {
                    used_bytes: 0,
                    available: false,
                }
            }
        }
    }
}
