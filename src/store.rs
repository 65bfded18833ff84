//! The collection store: state owner and action runtime.
//!
//! [`CollectionStore`] is constructed once at startup and passed explicitly to
//! whatever drives it. It owns the [`CollectionState`] snapshot and the three
//! collaborators the handler's actions talk to: persistence, notifications and
//! the search worker. Every intent goes through [`handle_event`]; the store
//! then executes the returned actions in order.
//!
//! # Failure Handling
//!
//! Persistence and remote-search failures never reach the caller. A failed save
//! is logged and the in-memory catalog stays authoritative; a failed search, or
//! a worker that cannot be reached, is applied as an empty page.
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::remote::OfflineSearch;
//! use shelfkeeper::storage::MemoryStorage;
//! use shelfkeeper::store::{CollectionStore, LogNotifier};
//! use shelfkeeper::ui::ThemeMode;
//! use shelfkeeper::CatalogEntry;
//!
//! let mut store = CollectionStore::open(
//!     Box::new(MemoryStorage::with_catalog(vec![])),
//!     Box::new(OfflineSearch),
//!     Box::new(LogNotifier),
//!     ThemeMode::System,
//! )?;
//! store.add_entry(CatalogEntry::new("b-1", "CS-001", "Clean Code", "Robert C. Martin"))?;
//! assert!(store.is_in_library("b-1"));
//! # Ok::<(), shelfkeeper::CatalogError>(())
//! ```

use crate::app::{
    handle_event, Action, CollectionState, Event, Notification, SortDirection, SortField, ViewMode,
};
use crate::domain::{CatalogEntry, Result};
use crate::remote::RemoteSearch;
use crate::storage::{seed_catalog, Storage};
use crate::ui::viewmodel::CollectionViewModel;
use crate::ui::{ThemeMode, THEME_PREFERENCE_KEY};
use crate::worker::{SearchWorker, WorkerHandle, WorkerMessage, WorkerResponse};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Receiver of user-facing notifications.
pub trait Notifier: Send {
    fn notify(&mut self, notification: &Notification);
}

/// Notifier that only writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) {
        tracing::info!(tone = notification.tone.as_str(), "{}", notification.message);
    }
}

/// Notifier that queues notifications for the front end to display.
///
/// Clones share the same queue.
#[derive(Debug, Default, Clone)]
pub struct QueueNotifier {
    queue: Arc<Mutex<Vec<Notification>>>,
}

impl QueueNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued notification, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

impl Notifier for QueueNotifier {
    fn notify(&mut self, notification: &Notification) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push(notification.clone());
        }
    }
}

/// Explicitly constructed owner of the collection state.
pub struct CollectionStore {
    state: CollectionState,
    storage: Box<dyn Storage>,
    notifier: Box<dyn Notifier>,
    worker: WorkerHandle,
    theme_mode: ThemeMode,
}

impl CollectionStore {
    /// Loads the catalog, reads the theme preference and starts the search worker.
    ///
    /// Falls back to the seed catalog when storage holds no catalog or cannot
    /// be read, and to `default_theme` when no valid theme preference is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn open(
        storage: Box<dyn Storage>,
        search: Box<dyn RemoteSearch>,
        notifier: Box<dyn Notifier>,
        default_theme: ThemeMode,
    ) -> Result<Self> {
        let _span = tracing::debug_span!("store_open").entered();

        let entries = load_catalog(storage.as_ref(), today());
        let theme_mode = load_theme_mode(storage.as_ref()).unwrap_or(default_theme);
        let worker = WorkerHandle::spawn(SearchWorker::new(search))?;

        tracing::info!(
            entry_count = entries.len(),
            theme = %theme_mode,
            "collection store opened"
        );

        Ok(Self {
            state: CollectionState::new(entries),
            storage,
            notifier,
            worker,
            theme_mode,
        })
    }

    /// Read-only view of the state snapshot.
    #[must_use]
    pub const fn state(&self) -> &CollectionState {
        &self.state
    }

    /// The authoritative catalog, newest first.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.state.entries
    }

    /// Routes an event through the handler and executes the resulting actions.
    ///
    /// Returns whether the view should be redrawn.
    ///
    /// # Errors
    ///
    /// Returns the handler's error for malformed intents; no action runs in that case.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.state, event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(render)
    }

    fn execute(&mut self, action: Action) {
        let _span = tracing::trace_span!("execute_action", action = ?action).entered();

        match action {
            Action::PersistCatalog => {
                if let Err(e) = self.storage.save(&self.state.entries) {
                    tracing::warn!(error = %e, "failed to persist catalog, keeping in-memory state");
                }
            }
            Action::Notify(notification) => self.notifier.notify(&notification),
            Action::PostToWorker(message) => {
                let WorkerMessage::SearchVolumes { request } = &message;
                let request = request.clone();
                if let Err(e) = self.worker.post(message) {
                    tracing::warn!(error = %e, "search worker unavailable, applying empty page");
                    self.state.apply_search_page(&request, Vec::new());
                }
            }
        }
    }

    /// Applies every response the worker has finished so far without blocking.
    ///
    /// Returns whether any of them changed the view.
    pub fn pump_worker(&mut self) -> bool {
        let mut render = false;
        while let Some(response) = self.worker.try_recv() {
            render |= self.apply_worker_response(response);
        }
        render
    }

    /// Blocks until no remote page is in flight or `timeout` elapses.
    ///
    /// Returns whether any applied response changed the view.
    pub fn wait_for_search(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut render = self.pump_worker();

        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!("gave up waiting for search results");
                break;
            }
            match self.worker.recv_timeout(remaining) {
                Some(response) => render |= self.apply_worker_response(response),
                None => break,
            }
        }
        render
    }

    fn apply_worker_response(&mut self, response: WorkerResponse) -> bool {
        // Worker responses never produce errors or actions.
        self.dispatch(&Event::WorkerResponse(response)).unwrap_or(false)
    }

    /// Prepends `entry` to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry's lending fields are inconsistent.
    pub fn add_entry(&mut self, entry: CatalogEntry) -> Result<()> {
        self.dispatch(&Event::AddEntry(entry)).map(drop)
    }

    /// Replaces the member with `entry`'s id. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry's lending fields are inconsistent.
    pub fn update_entry(&mut self, entry: CatalogEntry) -> Result<()> {
        self.dispatch(&Event::UpdateEntry(entry)).map(drop)
    }

    /// Removes the member with `id`. No-op if absent.
    pub fn delete_entry(&mut self, id: &str) {
        let _ = self.dispatch(&Event::DeleteEntry { id: id.to_string() });
    }

    /// Lends the member with `id` to `borrower` until `due_date`. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `borrower` or `due_date` is empty.
    pub fn check_out(&mut self, id: &str, borrower: &str, due_date: &str) -> Result<()> {
        self.dispatch(&Event::CheckOut {
            id: id.to_string(),
            borrower: borrower.to_string(),
            due_date: due_date.to_string(),
        })
        .map(drop)
    }

    /// Returns the member with `id`. No-op if absent.
    pub fn check_in(&mut self, id: &str) {
        let _ = self.dispatch(&Event::CheckIn { id: id.to_string() });
    }

    pub fn set_search_query(&mut self, query: &str) {
        let _ = self.dispatch(&Event::SetSearchQuery(query.to_string()));
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        let _ = self.dispatch(&Event::SetViewMode(mode));
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        let _ = self.dispatch(&Event::SetSortField(field));
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        let _ = self.dispatch(&Event::SetSortDirection(direction));
    }

    pub fn load_next_page(&mut self) {
        let _ = self.dispatch(&Event::LoadNextPage);
    }

    pub fn reset_visible_window(&mut self) {
        let _ = self.dispatch(&Event::ResetVisibleWindow);
    }

    #[must_use]
    pub fn is_catalog_number_taken(&self, catalog_number: &str, exclude_id: Option<&str>) -> bool {
        self.state.is_catalog_number_taken(catalog_number, exclude_id)
    }

    #[must_use]
    pub fn is_in_library(&self, id: &str) -> bool {
        self.state.is_in_library(id)
    }

    /// Whether `entry` is checked out and was due before today.
    #[must_use]
    pub fn is_overdue(&self, entry: &CatalogEntry) -> bool {
        entry.is_overdue_on(today())
    }

    #[must_use]
    pub fn filtered_entries(&self) -> Vec<CatalogEntry> {
        self.state.filtered_entries()
    }

    #[must_use]
    pub fn visible_entries(&self) -> Vec<CatalogEntry> {
        self.state.visible_entries()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    #[must_use]
    pub fn viewmodel(&self) -> CollectionViewModel {
        self.state.compute_viewmodel(today())
    }

    #[must_use]
    pub const fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    /// Advances the theme preference one step and persists it.
    ///
    /// A failed write is logged; the new mode applies for this session anyway.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme_mode = self.theme_mode.toggled();
        if let Err(e) = self
            .storage
            .save_preference(THEME_PREFERENCE_KEY, self.theme_mode.as_str())
        {
            tracing::warn!(error = %e, "failed to persist theme preference");
        }
        self.theme_mode
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn load_catalog(storage: &dyn Storage, today: NaiveDate) -> Vec<CatalogEntry> {
    match storage.load() {
        Ok(Some(entries)) => entries,
        Ok(None) => {
            tracing::info!("no stored catalog, starting from seed");
            seed_catalog(today)
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored catalog unreadable, starting from seed");
            seed_catalog(today)
        }
    }
}

fn load_theme_mode(storage: &dyn Storage) -> Option<ThemeMode> {
    match storage.load_preference(THEME_PREFERENCE_KEY) {
        Ok(Some(value)) => value
            .parse()
            .map_err(|e| tracing::warn!(error = %e, "ignoring stored theme preference"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "theme preference unreadable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogError;
    use crate::remote::OfflineSearch;
    use crate::storage::MemoryStorage;

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn load(&self) -> Result<Option<Vec<CatalogEntry>>> {
            Err(CatalogError::Storage("disk on fire".to_string()))
        }

        fn save(&mut self, _entries: &[CatalogEntry]) -> Result<()> {
            Err(CatalogError::Storage("quota exceeded".to_string()))
        }

        fn load_preference(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn save_preference(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(CatalogError::Storage("quota exceeded".to_string()))
        }
    }

    fn open(storage: MemoryStorage, notifier: QueueNotifier) -> CollectionStore {
        CollectionStore::open(
            Box::new(storage),
            Box::new(OfflineSearch),
            Box::new(notifier),
            ThemeMode::System,
        )
        .unwrap()
    }

    #[test]
    fn empty_storage_starts_from_seed() {
        let store = open(MemoryStorage::new(), QueueNotifier::new());
        assert_eq!(store.entries().len(), 4);
        assert!(store.is_in_library("seed-1"));
    }

    #[test]
    fn stored_empty_catalog_is_respected() {
        let store = open(MemoryStorage::with_catalog(vec![]), QueueNotifier::new());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn unreadable_storage_falls_back_and_swallows_save_errors() {
        let mut store = CollectionStore::open(
            Box::new(FailingStorage),
            Box::new(OfflineSearch),
            Box::new(LogNotifier),
            ThemeMode::Dark,
        )
        .unwrap();
        assert_eq!(store.entries().len(), 4);

        store.delete_entry("seed-1");
        assert_eq!(store.entries().len(), 3);
        assert_eq!(store.toggle_theme(), ThemeMode::System);
    }

    #[test]
    fn every_mutation_persists_and_notifies() {
        let storage = MemoryStorage::with_catalog(vec![]);
        let notifier = QueueNotifier::new();
        let mut store = open(storage.clone(), notifier.clone());

        store
            .add_entry(CatalogEntry::new("a", "CS-001", "Clean Code", "Martin"))
            .unwrap();
        store.check_out("a", "Alice", "2026-03-01").unwrap();
        store.check_in("a");
        store.delete_entry("a");
        store.delete_entry("a");

        assert_eq!(storage.save_count(), 4);
        assert_eq!(storage.snapshot(), Some(vec![]));
        let messages: Vec<String> = notifier.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "\"Clean Code\" added to library",
                "\"Clean Code\" checked out to Alice",
                "\"Clean Code\" checked back in",
                "\"Clean Code\" removed from library",
            ]
        );
    }

    #[test]
    fn theme_preference_round_trips_through_storage() {
        let storage = MemoryStorage::with_catalog(vec![]);
        let mut store = open(storage.clone(), QueueNotifier::new());
        assert_eq!(store.theme_mode(), ThemeMode::System);
        assert_eq!(store.toggle_theme(), ThemeMode::Light);

        let reopened = open(storage, QueueNotifier::new());
        assert_eq!(reopened.theme_mode(), ThemeMode::Light);
    }

    #[test]
    fn offline_discover_search_settles_empty() {
        let mut store = open(MemoryStorage::new(), QueueNotifier::new());
        store.set_view_mode(ViewMode::Discover);
        store.set_search_query("clean");
        assert!(store.is_loading());

        store.wait_for_search(Duration::from_secs(5));
        assert!(!store.is_loading());
        assert!(store.visible_entries().is_empty());
        assert!(!store.has_more());
    }
}
