//! Shelfkeeper: a personal book catalog with remote discovery.
//!
//! Shelfkeeper keeps a catalog of the books you own and lend out, and lets you
//! search Google Books for titles you don't have yet:
//! - Add, edit and remove entries, with form validation
//! - Lend entries out and take them back, with overdue tracking
//! - Search, sort and scroll through the local catalog
//! - Page through remote search results, with owned titles shown as owned
//! - Persistent state backed by JSON file storage
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal Front End (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Collection Store (store)                           │  ← State owner
//! │  - Executes actions against collaborators           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Pure logic
//! │  - Event handling                                   │
//! │  - Derivations and view model computation           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - Rendering   │   │ - JSON I/O    │   │ - Search      │
//! │ - Theming     │   │ - Seed data   │   │   thread      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                 │
//!                                         ┌───────────────┐
//!                                         │ Remote (remote│
//!                                         │ /) Google     │
//!                                         │ Books client  │
//!                                         └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: State snapshot, event handler and derivations
//! - [`domain`]: Catalog entry model, validation, errors
//! - [`store`]: The collection store and notification sinks
//! - [`storage`]: JSON file persistence and the seed catalog
//! - [`remote`]: Remote search seam and Google Books client
//! - [`worker`]: Background search thread
//! - [`ui`]: Terminal rendering with theme support
//! - [`infrastructure`]: Data directory resolution
//! - [`observability`]: JSON log file setup
//!
//! # Configuration
//!
//! Configuration is read from an optional TOML file:
//!
//! ```toml
//! data_dir = "~/.local/share/shelfkeeper"
//! search_endpoint = "https://www.googleapis.com/books/v1/volumes"
//! request_timeout_secs = 10
//! theme = "system"
//! trace_level = "info"
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::store::QueueNotifier;
//! use shelfkeeper::{initialize, Config};
//!
//! let dir = tempfile::tempdir()?;
//! let config = Config {
//!     data_dir: dir.path().to_path_buf(),
//!     offline: true,
//!     ..Config::default()
//! };
//!
//! let mut store = initialize(&config, Box::new(QueueNotifier::new()))?;
//! store.set_search_query("clean");
//! assert_eq!(store.visible_entries()[0].title, "Clean Code");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod remote;
pub mod storage;
pub mod store;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, CollectionState, Event, SortDirection, SortField, ViewMode};
pub use domain::{CatalogEntry, CatalogError, EntryDraft, Result};
pub use store::CollectionStore;
pub use ui::ThemeMode;

use remote::{GoogleBooksClient, OfflineSearch, RemoteSearch, DEFAULT_ENDPOINT};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::{JsonStorage, MemoryStorage, Storage};
use store::Notifier;

/// Default remote request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration.
///
/// Built from a string map ([`Config::from_map`]) or a TOML file
/// ([`Config::from_file`]); unknown keys are ignored and unparseable values fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory for the catalog, preferences and log file.
    pub data_dir: PathBuf,

    /// Google Books volumes endpoint.
    pub search_endpoint: String,

    /// Per-request timeout of remote searches.
    pub request_timeout_secs: u64,

    /// Theme used until the user toggles one.
    pub theme: ThemeMode,

    /// Log level when `RUST_LOG` is unset. Options: `trace`, `debug`, `info`, `warn`, `error`.
    pub trace_level: Option<String>,

    /// Keep everything in memory and never touch the network.
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::get_data_dir(),
            search_endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            theme: ThemeMode::System,
            trace_level: None,
            offline: false,
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - `data_dir`: Path, `~` expanded against `$HOME`
    /// - `search_endpoint`: Non-empty string
    /// - `request_timeout_secs`: Positive integer (falls back to 10)
    /// - `theme`: `light`, `dark` or `system` (falls back to `system`)
    /// - `trace_level`: String
    /// - `offline`: `true` or `false`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use shelfkeeper::{Config, ThemeMode};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("theme".to_string(), "dark".to_string());
    /// map.insert("request_timeout_secs".to_string(), "oops".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.theme, ThemeMode::Dark);
    /// assert_eq!(config.request_timeout_secs, 10);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let home = std::env::var("HOME").ok();

        let data_dir = config
            .get("data_dir")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.data_dir, |s| {
                PathBuf::from(infrastructure::expand_tilde(s, home.as_deref()))
            });

        let search_endpoint = config
            .get("search_endpoint")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.search_endpoint);

        let request_timeout_secs = config
            .get("request_timeout_secs")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.request_timeout_secs);

        let theme = config
            .get("theme")
            .and_then(|s| {
                s.parse::<ThemeMode>()
                    .map_err(|e| tracing::debug!(error = %e, "ignoring configured theme"))
                    .ok()
            })
            .unwrap_or(defaults.theme);

        Self {
            data_dir,
            search_endpoint,
            request_timeout_secs,
            theme,
            trace_level: config.get("trace_level").cloned(),
            offline: config.get("offline").is_some_and(|s| s.trim() == "true"),
        }
    }

    /// Reads configuration from a TOML file of flat `key = value` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e| CatalogError::Config(format!("invalid config file: {e}")))?;

        let map = table
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(n) => n.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    other => {
                        tracing::debug!(key = %key, value = %other, "ignoring non-scalar config value");
                        return None;
                    }
                };
                Some((key, text))
            })
            .collect();

        Ok(Self::from_map(&map))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Builds the collection store described by `config`.
///
/// Online, the catalog lives in `config.data_dir` and searches go to
/// `config.search_endpoint`; offline, both are replaced by in-memory stand-ins.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the search
/// worker cannot be started.
pub fn initialize(config: &Config, notifier: Box<dyn Notifier>) -> Result<CollectionStore> {
    tracing::debug!(
        data_dir = ?config.data_dir,
        offline = config.offline,
        "initializing shelfkeeper"
    );

    let (storage, search): (Box<dyn Storage>, Box<dyn RemoteSearch>) = if config.offline {
        (Box::new(MemoryStorage::new()), Box::new(OfflineSearch))
    } else {
        (
            Box::new(JsonStorage::new(config.data_dir.clone())?),
            Box::new(GoogleBooksClient::new(
                config.search_endpoint.clone(),
                config.request_timeout(),
            )),
        )
    };

    CollectionStore::open(storage, search, notifier, config.theme)
}
