//! End-to-end tests of the collection store against file storage and a
//! scripted remote search.

use shelfkeeper::remote::{RemoteSearch, SearchRequest};
use shelfkeeper::storage::{JsonStorage, MemoryStorage};
use shelfkeeper::store::{CollectionStore, QueueNotifier};
use shelfkeeper::ui::ThemeMode;
use shelfkeeper::{CatalogEntry, CatalogError, EntryDraft, SortField, ViewMode};
use std::time::Duration;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

/// Remote search over a fixed-size result set of `total` volumes per query.
///
/// Volume ids are `<query>-<index>`. With `overlap`, every page after the first
/// also repeats the last `overlap` volumes of the previous page.
struct ScriptedSearch {
    total: usize,
    overlap: usize,
}

impl RemoteSearch for ScriptedSearch {
    fn search(&self, request: &SearchRequest) -> shelfkeeper::Result<Vec<CatalogEntry>> {
        if request.query == "offline" {
            return Err(CatalogError::Remote("connection refused".to_string()));
        }
        let start = request.start_index.saturating_sub(self.overlap);
        let end = (start + request.page_size).min(self.total);
        Ok((start..end)
            .map(|i| {
                CatalogEntry::new(
                    format!("{}-{i}", request.query),
                    format!("GB-{i}"),
                    format!("{} volume {i}", request.query),
                    "Remote Author",
                )
            })
            .collect())
    }
}

fn open_with(storage: MemoryStorage, total: usize, overlap: usize) -> (CollectionStore, QueueNotifier) {
    let notifications = QueueNotifier::new();
    let store = CollectionStore::open(
        Box::new(storage),
        Box::new(ScriptedSearch { total, overlap }),
        Box::new(notifications.clone()),
        ThemeMode::System,
    )
    .unwrap();
    (store, notifications)
}

fn open_json(dir: &TempDir) -> CollectionStore {
    CollectionStore::open(
        Box::new(JsonStorage::new(dir.path().to_path_buf()).unwrap()),
        Box::new(ScriptedSearch { total: 0, overlap: 0 }),
        Box::new(QueueNotifier::new()),
        ThemeMode::System,
    )
    .unwrap()
}

fn ids(store: &CollectionStore) -> Vec<String> {
    store.visible_entries().into_iter().map(|e| e.id).collect()
}

#[test]
fn catalog_and_theme_survive_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = open_json(&dir);
        assert_eq!(store.entries().len(), 4, "first start seeds the catalog");

        let draft = EntryDraft {
            title: "Dune".to_string(),
            authors: "Frank Herbert".to_string(),
            catalog_number: "SF-001".to_string(),
            published_date: "1965".to_string(),
            ..EntryDraft::default()
        };
        draft
            .validate(|n| store.is_catalog_number_taken(n, None))
            .unwrap();
        let entry = draft.into_entry(None);
        let id = entry.id.clone();

        store.add_entry(entry).unwrap();
        store.check_out(&id, "Carol", "2030-01-01").unwrap();
        store.delete_entry("seed-3");
        assert_eq!(store.toggle_theme(), ThemeMode::Light);
    }

    let store = open_json(&dir);
    let entries = store.entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].title, "Dune");
    assert!(entries[0].is_checked_out);
    assert_eq!(entries[0].checked_out_by, "Carol");
    assert!(entries.iter().all(|e| e.id != "seed-3"));
    assert_eq!(store.theme_mode(), ThemeMode::Light);
    assert!(store.is_catalog_number_taken("SF-001", None));
}

#[test]
fn emptied_catalog_stays_empty_after_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = open_json(&dir);
        let ids: Vec<String> = store.entries().iter().map(|e| e.id.clone()).collect();
        for id in ids {
            store.delete_entry(&id);
        }
    }

    let store = open_json(&dir);
    assert!(store.entries().is_empty());
    let vm = store.viewmodel();
    assert_eq!(vm.empty_state.map(|e| e.title).as_deref(), Some("Your library is empty"));
}

#[test]
fn corrupt_catalog_falls_back_to_seed() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("books.json"), "{ not json").unwrap();

    let store = open_json(&dir);
    assert_eq!(store.entries().len(), 4);
}

#[test]
fn discover_pages_until_results_run_out() {
    let (mut store, _) = open_with(MemoryStorage::with_catalog(vec![]), 45, 0);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("rust");
    assert!(store.is_loading());
    store.wait_for_search(WAIT);
    assert_eq!(store.visible_entries().len(), 20);
    assert!(store.has_more());

    store.load_next_page();
    store.wait_for_search(WAIT);
    assert_eq!(store.visible_entries().len(), 40);
    assert!(store.has_more());

    store.load_next_page();
    store.wait_for_search(WAIT);
    assert_eq!(store.visible_entries().len(), 45);
    assert!(!store.has_more());

    store.load_next_page();
    assert!(!store.is_loading());
    assert_eq!(store.visible_entries().len(), 45);
}

#[test]
fn overlapping_pages_are_deduplicated() {
    let (mut store, _) = open_with(MemoryStorage::with_catalog(vec![]), 100, 5);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("go");
    store.wait_for_search(WAIT);
    store.load_next_page();
    store.wait_for_search(WAIT);

    let ids = ids(&store);
    assert_eq!(ids.len(), 35);
    let unique: std::collections::HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn superseded_query_results_are_discarded() {
    let (mut store, _) = open_with(MemoryStorage::with_catalog(vec![]), 30, 0);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("alpha");
    store.set_search_query("beta");
    store.wait_for_search(WAIT);

    let ids = ids(&store);
    assert_eq!(ids.len(), 20);
    assert!(ids.iter().all(|id| id.starts_with("beta-")));
    assert!(!store.is_loading());
}

#[test]
fn sort_change_restarts_discover_paging() {
    let (mut store, _) = open_with(MemoryStorage::with_catalog(vec![]), 100, 0);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("history");
    store.wait_for_search(WAIT);
    store.load_next_page();
    store.wait_for_search(WAIT);
    assert_eq!(store.visible_entries().len(), 40);

    store.set_sort_field(SortField::Newest);
    store.wait_for_search(WAIT);
    assert_eq!(store.state().remote.cursor, 0);
    assert_eq!(store.visible_entries().len(), 20);
}

#[test]
fn owned_results_show_the_local_record() {
    let mut owned = CatalogEntry::new("dune-2", "SF-001", "Dune (my copy)", "Frank Herbert");
    owned.check_out("Alice", "2030-01-01");
    let (mut store, notifications) = open_with(MemoryStorage::with_catalog(vec![owned]), 10, 0);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("dune");
    store.wait_for_search(WAIT);

    let results = store.visible_entries();
    assert_eq!(results.len(), 10);
    assert_eq!(results[2].title, "Dune (my copy)");
    assert!(results[2].is_checked_out);
    assert!(store.is_in_library("dune-2"));
    assert!(!store.is_in_library("dune-3"));

    let hit = results[3].clone();
    store.add_entry(hit).unwrap();
    assert!(store.is_in_library("dune-3"));
    assert_eq!(store.entries()[0].catalog_number, "GB-3");

    let messages: Vec<String> = notifications.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["\"dune volume 3\" added to library".to_string()]);
}

#[test]
fn failed_search_degrades_to_empty_results() {
    let (mut store, _) = open_with(MemoryStorage::with_catalog(vec![]), 10, 0);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("offline");
    store.wait_for_search(WAIT);

    assert!(!store.is_loading());
    assert!(store.visible_entries().is_empty());
    assert!(!store.has_more());
}

#[test]
fn switching_back_to_local_resets_the_view() {
    let (mut store, _) = open_with(MemoryStorage::new(), 10, 0);

    store.set_view_mode(ViewMode::Discover);
    store.set_search_query("dune");
    store.wait_for_search(WAIT);
    store.set_view_mode(ViewMode::Local);

    assert_eq!(store.state().search_query, "");
    assert_eq!(store.visible_entries().len(), 4);
    assert!(store.state().remote.results.is_empty());
}
