//! Favorite cities, persisted as a JSON string array in a key-value store.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::StoreError;

/// Key the favorites list is stored under
pub const FAVORITES_KEY: &str = "weatherFavorites";

/// String key-value persistence, last writer wins
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Key-value store backed by a single JSON object file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write of the file within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        // A corrupt file is replaced rather than blocking every later write
        let mut values = self.read_all().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "Replacing unreadable store: {}", e);
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered, duplicate-free list of favorite city names
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    favorites: Vec<String>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("favorites", &self.favorites)
            .finish()
    }
}

impl FavoritesStore {
    /// Load the persisted list; a missing or unreadable value starts empty
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let favorites = match Self::read(store.as_ref(), &key) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(key = %key, "Ignoring stored favorites: {}", e);
                Vec::new()
            }
        };
        tracing::debug!(count = favorites.len(), "Favorites loaded");

        Self {
            store,
            key,
            favorites,
        }
    }

    fn read(store: &dyn KeyValueStore, key: &str) -> Result<Vec<String>, StoreError> {
        let Some(raw) = store.get(key)? else {
            return Ok(Vec::new());
        };
        let list: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Parse(e.to_string()))?;

        // Collapse duplicates a foreign writer may have left behind
        let mut unique: Vec<String> = Vec::with_capacity(list.len());
        for city in list {
            if !unique.contains(&city) {
                unique.push(city);
            }
        }
        Ok(unique)
    }

    fn write(&self) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(&self.favorites).map_err(|e| StoreError::Parse(e.to_string()))?;
        self.store.set(&self.key, &json)
    }

    pub fn list(&self) -> &[String] {
        &self.favorites
    }

    pub fn contains(&self, city: &str) -> bool {
        self.favorites.iter().any(|c| c == city)
    }

    /// Append `city` unless an exact match exists, then persist the list.
    ///
    /// Returns whether the city was newly added.
    pub fn record(&mut self, city: &str) -> Result<bool, StoreError> {
        let added = !self.contains(city);
        if added {
            self.favorites.push(city.to_string());
        }
        self.write()?;
        Ok(added)
    }

    /// Empty the list and persist the empty list
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.favorites.clear();
        self.write()
    }
}
