//! Persistent UI preferences, stored as a flat JSON object on disk in the
//! same shape a browser's local storage would hold them.

use crate::error::Result;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SIDEBAR_MINIMIZED_KEY: &str = "sidebar-minimized";

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PreferenceStore {
    /// Opens the store; a missing file starts empty silently, an unreadable
    /// or corrupt one starts empty with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("ignoring corrupt preferences {}: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                log::warn!("cannot read preferences {}: {}", path.display(), e);
                Map::new()
            }
        };
        PreferenceStore { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Writes through to disk immediately.
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), Value::Bool(value));
        self.save()
    }

    /// Forgets a key so its default applies again.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        self.save()
    }

    pub fn sidebar_minimized(&self) -> bool {
        self.get_bool(SIDEBAR_MINIMIZED_KEY).unwrap_or(false)
    }

    pub fn set_sidebar_minimized(&mut self, minimized: bool) -> Result<()> {
        self.set_bool(SIDEBAR_MINIMIZED_KEY, minimized)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let s = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, s)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let mut store = PreferenceStore::open(&path);
        assert!(!store.sidebar_minimized());
        store.set_sidebar_minimized(true).unwrap();

        let reloaded = PreferenceStore::open(&path);
        assert_eq!(reloaded.get_bool(SIDEBAR_MINIMIZED_KEY), Some(true));

        let mut store = reloaded;
        store.set_sidebar_minimized(false).unwrap();
        assert!(!PreferenceStore::open(&path).sidebar_minimized());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "[1, 2").unwrap();
        let store = PreferenceStore::open(&path);
        assert_eq!(store.get_bool(SIDEBAR_MINIMIZED_KEY), None);
    }

    #[test]
    fn test_unreadable_path_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path());
        assert_eq!(store.get_bool(SIDEBAR_MINIMIZED_KEY), None);
        assert!(!store.sidebar_minimized());
    }

    #[test]
    fn test_remove_restores_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let mut store = PreferenceStore::open(&path);
        store.set_sidebar_minimized(true).unwrap();
        store.remove(SIDEBAR_MINIMIZED_KEY).unwrap();
        assert!(!store.sidebar_minimized());

        let reloaded = PreferenceStore::open(&path);
        assert_eq!(reloaded.get_bool(SIDEBAR_MINIMIZED_KEY), None);
    }
}
