use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{MyFlixError, Result};

/// String key/value persistence in the shape of the browser's `localStorage`.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Writes several entries. Backends that can do so apply them as one unit.
    fn set_items(&self, items: &[(&str, &str)]) -> Result<()> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove_item(key)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| MyFlixError::Storage(format!("memory storage poisoned: {e}")))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.entries()?;
        for (key, value) in items {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries()?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
