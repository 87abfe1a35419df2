use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::storage::KeyValueStorage;
use crate::error::{MyFlixError, Result};

type Entries = BTreeMap<String, String>;

/// Key/value entries kept in a single JSON object on disk.
///
/// Each write reads the file, applies the change and replaces the file through
/// a temporary sibling and a rename, so a batch lands all at once or not at all.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Entries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Session file {} is unreadable, treating as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(Entries::new())
            }
        }
    }

    fn write(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| MyFlixError::Storage(format!("{} has no file name", self.path.display())))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(json.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} session entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Entries)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| MyFlixError::Storage(format!("file storage poisoned: {e}")))?;
        let mut entries = self.read()?;
        f(&mut entries);
        self.write(&entries)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.set_items(&[(key, value)])
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.remove_items(&[key])
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<()> {
        self.update(|entries| {
            for (key, value) in items {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}
