use gloo::storage::{LocalStorage, Storage};
use parejas_core::KeyValueStore;

/// Browser `localStorage`, values are kept as the raw JSON strings the core writes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("failed to read {:?}: {:?}", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String) {
        if let Err(err) = LocalStorage::raw().set_item(key, &value) {
            log::error!("failed to write {:?}: {:?}", key, err);
        }
    }
}
