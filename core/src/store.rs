use alloc::string::{String, ToString};
use hashbrown::HashMap;
use serde::{Serialize, de::DeserializeOwned};

/// String keyed storage the game persists into, `localStorage` in a browser.
///
/// Writes are last-writer-wins and may silently fail, the game never depends
/// on reading back what it wrote.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value)
    }
}

/// Values stored under a fixed key.
pub trait StorageKey {
    const KEY: &'static str;
}

/// Reads `key` as JSON, absent and malformed values are both `None`.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("ignoring malformed value under {:?}: {}", key, err);
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, raw),
        Err(err) => log::error!("failed to serialize value for {:?}: {}", key, err),
    }
}

pub trait LocalOrDefault: Sized {
    fn load_or_default(store: &impl KeyValueStore) -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn load_or_default(store: &impl KeyValueStore) -> Self {
        load_json(store, T::KEY).unwrap_or_default()
    }
}

pub trait LocalSave {
    fn save(&self, store: &mut impl KeyValueStore);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn save(&self, store: &mut impl KeyValueStore) {
        save_json(store, T::KEY, self)
    }
}

/// In-memory store for tests and hosts without persistent storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}
