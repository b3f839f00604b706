use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BingoError, Result};

pub const CARD_KEY: &str = "bingo_card";
pub const CARD_ID_KEY: &str = "bingo_card_id";
pub const ACHIEVED_BINGO_KEY: &str = "bingo_has_achieved_bingo";
pub const STATS_KEY: &str = "bingo_stats";
pub const SETTINGS_KEY: &str = "app_settings";
pub const LAST_ACTIVITY_KEY: &str = "bingo_last_activity";

/// Durable string key/value storage that survives a reload.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and parses a stored value. Absent, unreadable or corrupt values read as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let contents = match store.get(key) {
        Ok(Some(contents)) => contents,
        Ok(None) => return None,
        Err(e) => {
            error!(target: "store", "Failed to read {}: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(target: "store", "Discarding unparseable value for {}: {}", key, e);
            None
        }
    }
}

/// Serializes and stores a value. Failures are logged and reported as `false`.
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(BingoError::from)
        .and_then(|contents| store.set(key, &contents));
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(target: "store", "Failed to save {}: {}", key, e);
            false
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail, as a full or unavailable store would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(BingoError::Store(format!("write to {} rejected", key)));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameStats;
    use uuid::Uuid;

    #[test]
    fn test_load_missing_and_corrupt_values() {
        let store = MemoryStore::new();
        assert_eq!(load_json::<GameStats>(&store, STATS_KEY), None);

        store.set(STATS_KEY, "{not json").unwrap();
        assert_eq!(load_json::<GameStats>(&store, STATS_KEY), None);
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(!save_json(&store, STATS_KEY, &GameStats::default()));
        assert!(!store.contains(STATS_KEY));

        store.set_fail_writes(false);
        assert!(save_json(&store, STATS_KEY, &GameStats::default()));
        assert_eq!(
            load_json::<GameStats>(&store, STATS_KEY),
            Some(GameStats::default())
        );
    }

    #[test]
    fn test_file_store_creates_directory_and_removes() {
        let dir = std::env::temp_dir().join(format!("ballpark-bingo-{}", Uuid::new_v4()));
        let store = FileStore::new(&dir);

        assert_eq!(store.get(LAST_ACTIVITY_KEY).unwrap(), None);
        store.set(LAST_ACTIVITY_KEY, "1700000000000").unwrap();
        assert_eq!(
            store.get(LAST_ACTIVITY_KEY).unwrap().as_deref(),
            Some("1700000000000")
        );
        store.remove(LAST_ACTIVITY_KEY).unwrap();
        assert_eq!(store.get(LAST_ACTIVITY_KEY).unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }
}
