//! In-memory storage backend.
//!
//! Nothing survives the process. Used by `--offline` runs and by tests, which
//! keep a clone of the handle to inspect what the store wrote.

use crate::domain::{CatalogEntry, CatalogError, Result};
use crate::storage::backend::Storage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryData {
    catalog: Option<Vec<CatalogEntry>>,
    preferences: HashMap<String, String>,
    save_count: usize,
}

/// Process-local storage. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that already holds `entries`.
    #[must_use]
    pub fn with_catalog(entries: Vec<CatalogEntry>) -> Self {
        let storage = Self::default();
        if let Ok(mut data) = storage.data.lock() {
            data.catalog = Some(entries);
        }
        storage
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryData>> {
        self.data
            .lock()
            .map_err(|_| CatalogError::Storage("memory storage lock poisoned".to_string()))
    }

    /// The catalog as last saved, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<CatalogEntry>> {
        self.lock().ok().and_then(|data| data.catalog.clone())
    }

    /// Number of catalog saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().map_or(0, |data| data.save_count)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<CatalogEntry>>> {
        Ok(self.lock()?.catalog.clone())
    }

    fn save(&mut self, entries: &[CatalogEntry]) -> Result<()> {
        let mut data = self.lock()?;
        data.catalog = Some(entries.to_vec());
        data.save_count += 1;
        Ok(())
    }

    fn load_preference(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.preferences.get(key).cloned())
    }

    fn save_preference(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock()?
            .preferences
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_saved_catalog() {
        let observer = MemoryStorage::new();
        let mut writer = observer.clone();

        writer.save(&[CatalogEntry::new("a", "CS-001", "First", "Author")]).unwrap();

        assert_eq!(observer.save_count(), 1);
        assert_eq!(observer.snapshot().unwrap()[0].id, "a");
    }

    #[test]
    fn starts_without_catalog() {
        assert_eq!(MemoryStorage::new().load().unwrap(), None);
    }
}
