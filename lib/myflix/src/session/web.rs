use super::storage::KeyValueStorage;
use crate::error::{MyFlixError, Result};

/// The browser's `window.localStorage`.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| MyFlixError::Storage("localStorage is unavailable".to_string()))
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| MyFlixError::Storage(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| MyFlixError::Storage(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| MyFlixError::Storage(format!("{e:?}")))
    }
}
