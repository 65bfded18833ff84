//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over persistence
//! backends. The store reads the catalog once at startup and writes the whole
//! catalog back after every mutation, so the trait is a load/save pair plus a
//! small string preference slot for settings such as the theme.

use crate::domain::{CatalogEntry, Result};

/// Storage key of the catalog.
pub const CATALOG_KEY: &str = "books";

/// Abstraction over persistent storage backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): One JSON file per key with atomic writes (default)
/// - [`MemoryStorage`](crate::storage::MemoryStorage): Process-local, used offline and in tests
///
/// # Examples
///
/// ```no_run
/// use shelfkeeper::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/shelfkeeper"))?;
/// let catalog = storage.load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Reads the stored catalog.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. An empty catalog
    /// that was stored explicitly comes back as `Ok(Some(vec![]))`.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Vec<CatalogEntry>>>;

    /// Replaces the stored catalog with `entries`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, entries: &[CatalogEntry]) -> Result<()>;

    /// Reads a stored preference value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be read.
    fn load_preference(&self, key: &str) -> Result<Option<String>>;

    /// Stores a preference value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_preference(&mut self, key: &str, value: &str) -> Result<()>;
}
