use crate::errors::StorageError;
use std::collections::BTreeMap;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

/// Roughly what browsers grant a single origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// String key-value store the storage accessor sits on. Implementations may
/// refuse any call.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Size as a browser counts it: two bytes per UTF-16 code unit.
pub fn utf16_bytes(text: &str) -> usize {
    text.encode_utf16().count() * 2
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new(items: BTreeMap<String, String>, quota_bytes: Option<usize>) -> Self {
        Self { items, quota_bytes }
    }

    pub fn items(&self) -> &BTreeMap<String, String> {
        &self.items
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| utf16_bytes(existing) + utf16_bytes(value))
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + utf16_bytes(key) + utf16_bytes(value);
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.items.keys().cloned().collect())
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}

pub fn resolve_quota() -> usize {
    env::var("APP_STORAGE_QUOTA")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(DEFAULT_QUOTA_BYTES)
}

/// Reads the store snapshot; a missing or corrupt file yields an empty store.
pub async fn load_snapshot(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                error!("failed to parse snapshot file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read snapshot file: {err}");
            BTreeMap::new()
        }
    }
}

pub async fn persist_snapshot(
    path: &Path,
    items: &BTreeMap<String, String>,
) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(items)?;
    fs::write(path, payload)
        .await
        .map_err(|err| StorageError::WriteFailed(err.to_string()))
}
