//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. Each storage key maps to one file in the data directory
//! (`books.json`, `app-theme.json`), and every write is atomic
//! (write-to-temp + rename) so a crash never leaves a truncated catalog behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(n) - parses the whole catalog once at startup
//! - **Write**: O(n) - serializes and writes the whole catalog on each mutation
//! - **Best for**: personal collections of a few thousand entries

use crate::domain::{CatalogEntry, CatalogError, Result};
use crate::storage::backend::{Storage, CATALOG_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// # File Format
///
/// `books.json` holds the catalog as a bare array of entries, in catalog order:
///
/// ```json
/// [
///   {
///     "id": "seed-1",
///     "catalogNumber": "CS-001",
///     "title": "Clean Code",
///     "authors": "Robert C. Martin",
///     "publisher": "Prentice Hall",
///     "publishedDate": "2008",
///     "description": "",
///     "pageCount": 431,
///     "categories": "Programming",
///     "thumbnail": "",
///     "isCheckedOut": false,
///     "checkedOutBy": "",
///     "dueDate": ""
///   }
/// ]
/// ```
///
/// Preferences are stored as a single JSON string per file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    /// Directory holding one file per key.
    data_dir: PathBuf,
}

impl JsonStorage {
    /// Opens a storage rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shelfkeeper::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/shelfkeeper"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?data_dir, "initializing JSON storage");
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// Reads and parses the file behind `key`, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            tracing::debug!(key = key, "no stored data");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        let value = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::Storage(format!("failed to parse {key}: {e}")))?;
        Ok(Some(value))
    }

    /// Serializes `value` into the file behind `key` using an atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the write or the rename fails.
    fn write_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| CatalogError::Storage(format!("failed to serialize {key}: {e}")))?;

        let tmp_path = path.with_extension("json.tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> Result<Option<Vec<CatalogEntry>>> {
        let _span = tracing::debug_span!("json_load_catalog").entered();

        let entries: Option<Vec<CatalogEntry>> = self.read_key(CATALOG_KEY)?;
        tracing::debug!(count = entries.as_ref().map(Vec::len), "catalog loaded");
        Ok(entries)
    }

    fn save(&mut self, entries: &[CatalogEntry]) -> Result<()> {
        let _span = tracing::debug_span!("json_save_catalog", count = entries.len()).entered();

        self.write_key(CATALOG_KEY, entries)?;
        tracing::debug!("catalog saved successfully");
        Ok(())
    }

    fn load_preference(&self, key: &str) -> Result<Option<String>> {
        self.read_key(key)
    }

    fn save_preference(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_save_preference", key = key).entered();
        self.write_key(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, JsonStorage) {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    #[test]
    fn fresh_directory_has_no_catalog() {
        let (_dir, storage) = storage();
        assert_eq!(storage.load().unwrap(), None);
        assert!(storage.data_dir().is_dir());
    }

    #[test]
    fn saved_catalog_loads_back_in_order() {
        let (_dir, mut storage) = storage();
        let mut lent = CatalogEntry::new("b", "CS-002", "Second", "Author");
        lent.check_out("Alice", "2026-03-01");
        let entries = vec![CatalogEntry::new("a", "CS-001", "First", "Author"), lent];

        storage.save(&entries).unwrap();
        assert_eq!(storage.load().unwrap(), Some(entries));
    }

    #[test]
    fn stored_empty_catalog_stays_empty() {
        let (_dir, mut storage) = storage();
        storage.save(&[]).unwrap();
        assert_eq!(storage.load().unwrap(), Some(vec![]));
    }

    #[test]
    fn file_uses_camel_case_array() {
        let (_dir, mut storage) = storage();
        storage
            .save(&[CatalogEntry::new("a", "CS-001", "First", "Author")])
            .unwrap();

        let raw = std::fs::read_to_string(storage.data_dir().join("books.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["catalogNumber"], "CS-001");
        assert!(!storage.data_dir().join("books.json.tmp").exists());
    }

    #[test]
    fn corrupt_catalog_is_a_storage_error() {
        let (_dir, storage) = storage();
        std::fs::write(storage.data_dir().join("books.json"), "{not json").unwrap();
        assert!(matches!(storage.load(), Err(CatalogError::Storage(_))));
    }

    #[test]
    fn preferences_round_trip() {
        let (_dir, mut storage) = storage();
        assert_eq!(storage.load_preference("app-theme").unwrap(), None);

        storage.save_preference("app-theme", "dark").unwrap();
        assert_eq!(storage.load_preference("app-theme").unwrap().as_deref(), Some("dark"));
    }
}
