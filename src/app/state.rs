//! Collection state and derived view computation.
//!
//! This module defines [`CollectionState`], a plain snapshot of every state cell
//! the collection view depends on: the authoritative catalog, the view
//! configuration and both pagination cursors. Everything the presentation layer
//! reads beyond those cells is derived by pure methods on the snapshot and
//! recomputed on each call; nothing here performs I/O.
//!
//! # State Components
//!
//! - **Entries**: The authoritative catalog, newest first
//! - **View configuration**: Mode, query, the two sort cells and direction
//! - **Revealed count**: Local-mode infinite scroll window
//! - **Remote pager**: Discover-mode cursor, accumulated results, in-flight request
//!
//! # Derivation Pipeline
//!
//! Local mode narrows the catalog by a case-insensitive substring match on
//! title, authors or catalog number, sorts it, and windows it by the revealed
//! count. Discover mode shows the accumulated remote results in full, with any
//! result whose id is in the catalog replaced by the local record.
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::app::CollectionState;
//! use shelfkeeper::CatalogEntry;
//!
//! let mut state = CollectionState::new(vec![
//!     CatalogEntry::new("1", "CS-001", "Clean Code", "Robert C. Martin"),
//!     CatalogEntry::new("2", "CS-003", "Design Patterns", "Gang of Four"),
//! ]);
//! state.search_query = "clean".to_string();
//! assert_eq!(state.filtered_entries().len(), 1);
//! ```

use super::modes::{SortDirection, SortField, ViewMode};
use crate::domain::CatalogEntry;
use crate::remote::SearchRequest;
use crate::ui::viewmodel::{
    Badge, CollectionViewModel, DisplayItem, EmptyState, FooterInfo, HeaderInfo,
};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Entries revealed per local-mode "load more".
pub const BATCH_SIZE: usize = 10;

/// Results requested per remote page.
pub const PAGE_SIZE: usize = 20;

/// Discover-mode pagination state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemotePager {
    /// Start index of the most recently requested page.
    pub cursor: usize,

    /// Results accumulated across pages, in arrival order, unique by id.
    pub results: Vec<CatalogEntry>,

    /// Whether the last page was full, suggesting more results exist.
    pub more_likely: bool,

    /// Request issued and not yet answered.
    pub in_flight: Option<SearchRequest>,
}

impl RemotePager {
    /// Drops accumulated results and pagination progress.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot of every state cell of the collection view.
///
/// Mutated by [`handle_event`](super::handle_event); derived values are
/// recomputed from the cells on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    /// The authoritative catalog, newest first.
    pub entries: Vec<CatalogEntry>,

    /// Which source feeds the list.
    pub view_mode: ViewMode,

    /// Raw search text as typed. Derivations use the trimmed form.
    pub search_query: String,

    /// Sort cell of local mode.
    pub local_sort_field: SortField,

    /// Sort cell of discover mode, sent as the remote `orderBy`.
    pub discover_sort_field: SortField,

    /// Local-mode direction.
    pub sort_direction: SortDirection,

    /// Local-mode visible window length.
    pub revealed_count: usize,

    /// Discover-mode pagination.
    pub remote: RemotePager,
}

impl CollectionState {
    /// Creates a state over `entries` with every view cell at its default.
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            view_mode: ViewMode::Local,
            search_query: String::new(),
            local_sort_field: SortField::LOCAL_DEFAULT,
            discover_sort_field: SortField::DISCOVER_DEFAULT,
            sort_direction: SortDirection::Asc,
            revealed_count: BATCH_SIZE,
            remote: RemotePager::default(),
        }
    }

    /// Resets every view cell for a fresh start in `mode`. The catalog is untouched.
    pub fn reset_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.search_query.clear();
        self.local_sort_field = SortField::LOCAL_DEFAULT;
        self.discover_sort_field = SortField::DISCOVER_DEFAULT;
        self.sort_direction = SortDirection::Asc;
        self.revealed_count = BATCH_SIZE;
        self.remote.clear();
    }

    #[must_use]
    pub fn trimmed_query(&self) -> &str {
        self.search_query.trim()
    }

    /// Whether the view is backed by remote search: discover mode with a non-empty query.
    #[must_use]
    pub fn is_remote_active(&self) -> bool {
        self.view_mode == ViewMode::Discover && !self.trimmed_query().is_empty()
    }

    /// The page request implied by the current cells, if remote search is active.
    #[must_use]
    pub fn current_request(&self) -> Option<SearchRequest> {
        self.is_remote_active().then(|| SearchRequest {
            query: self.trimmed_query().to_string(),
            page_size: PAGE_SIZE,
            start_index: self.remote.cursor,
            order_by: self.discover_sort_field,
        })
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.remote.in_flight.is_some()
    }

    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Whether `id` belongs to the authoritative catalog.
    #[must_use]
    pub fn is_in_library(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    /// Whether an entry other than `exclude_id` already uses `catalog_number`.
    #[must_use]
    pub fn is_catalog_number_taken(&self, catalog_number: &str, exclude_id: Option<&str>) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.catalog_number == catalog_number && Some(entry.id.as_str()) != exclude_id)
    }

    /// Entries matching the current mode, query and sort, before windowing.
    #[must_use]
    pub fn filtered_entries(&self) -> Vec<CatalogEntry> {
        let _span = tracing::trace_span!("filtered_entries",
            total_entries = self.entries.len(),
            view_mode = ?self.view_mode
        )
        .entered();

        match self.view_mode {
            ViewMode::Local => self.filter_local(),
            ViewMode::Discover => self.merge_remote(),
        }
    }

    /// The window of filtered entries the view shows.
    ///
    /// Remote results are shown in full since the remote source paginates;
    /// otherwise the first `revealed_count` filtered entries.
    #[must_use]
    pub fn visible_entries(&self) -> Vec<CatalogEntry> {
        let filtered = self.filtered_entries();
        if self.is_remote_active() {
            filtered
        } else {
            filtered.into_iter().take(self.revealed_count).collect()
        }
    }

    /// Whether scrolling further can reveal or fetch more entries.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.is_remote_active() {
            self.is_loading() || self.remote.more_likely
        } else {
            self.revealed_count < self.filtered_entries().len()
        }
    }

    fn filter_local(&self) -> Vec<CatalogEntry> {
        let query = self.trimmed_query().to_lowercase();

        let mut results: Vec<CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| query.is_empty() || matches_query(entry, &query))
            .cloned()
            .collect();

        let field = self.local_sort_field;
        results.sort_by(|a, b| {
            let ordering = collate(sort_value(a, field), sort_value(b, field));
            match self.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        results
    }

    fn merge_remote(&self) -> Vec<CatalogEntry> {
        let local: HashMap<&str, &CatalogEntry> = self
            .entries
            .iter()
            .map(|entry| (entry.id.as_str(), entry))
            .collect();

        self.remote
            .results
            .iter()
            .map(|hit| local.get(hit.id.as_str()).map_or_else(|| hit.clone(), |owned| (*owned).clone()))
            .collect()
    }

    /// Applies a fetched page if it answers the current request.
    ///
    /// A page for the first index replaces the accumulated results; later pages
    /// append only results with unseen ids. Returns `false` and leaves the
    /// results untouched when `request` is stale.
    pub fn apply_search_page(&mut self, request: &SearchRequest, page: Vec<CatalogEntry>) -> bool {
        if self.remote.in_flight.as_ref() == Some(request) {
            self.remote.in_flight = None;
        }

        if self.current_request().as_ref() != Some(request) {
            tracing::debug!(
                query = %request.query,
                start_index = request.start_index,
                "discarding stale search page"
            );
            return false;
        }

        let page_len = page.len();
        if request.start_index == 0 {
            self.remote.results = page;
        } else {
            let seen: HashSet<String> = self.remote.results.iter().map(|e| e.id.clone()).collect();
            let fresh: Vec<CatalogEntry> = page.into_iter().filter(|e| !seen.contains(&e.id)).collect();
            self.remote.results.extend(fresh);
        }
        self.remote.more_likely = page_len == request.page_size;

        tracing::debug!(
            page_len = page_len,
            accumulated = self.remote.results.len(),
            more_likely = self.remote.more_likely,
            "search page applied"
        );
        true
    }

    /// Computes the renderable view model for the current state.
    ///
    /// `today` decides which lent entries are flagged overdue.
    #[must_use]
    pub fn compute_viewmodel(&self, today: NaiveDate) -> CollectionViewModel {
        let filtered_count = self.filtered_entries().len();
        let visible = self.visible_entries();
        let is_loading = self.is_loading();

        let items = visible
            .iter()
            .enumerate()
            .map(|(idx, entry)| self.compute_display_item(idx + 1, entry, today))
            .collect();

        CollectionViewModel {
            header: self.compute_header(),
            summary: self.compute_summary(visible.len(), filtered_count),
            is_loading,
            items,
            empty_state: self.compute_empty_state(visible.is_empty(), is_loading),
            footer: self.compute_footer(filtered_count),
        }
    }

    fn compute_display_item(&self, position: usize, entry: &CatalogEntry, today: NaiveDate) -> DisplayItem {
        let badge = if !self.is_in_library(&entry.id) {
            Badge::External
        } else if entry.is_checked_out {
            Badge::CheckedOut {
                borrower: entry.checked_out_by.clone(),
                due_date: entry.due_date.clone(),
                overdue: entry.is_overdue_on(today),
            }
        } else {
            Badge::Available
        };

        DisplayItem {
            position,
            id: entry.id.clone(),
            title: entry.title.clone(),
            authors: entry.authors.clone(),
            catalog_number: entry.catalog_number.clone(),
            published_date: entry.published_date.clone(),
            badge,
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match self.view_mode {
            ViewMode::Local => "My Library",
            ViewMode::Discover => "Discover",
        };
        HeaderInfo {
            title: title.to_string(),
        }
    }

    fn compute_summary(&self, visible: usize, filtered: usize) -> String {
        match self.view_mode {
            ViewMode::Local => {
                let mut summary = format!("Showing {visible} of {filtered} books");
                if filtered != self.entries.len() {
                    summary.push_str(&format!(" (from {} total)", self.entries.len()));
                }
                summary
            }
            ViewMode::Discover => format!("{visible} results"),
        }
    }

    fn compute_empty_state(&self, nothing_visible: bool, is_loading: bool) -> Option<EmptyState> {
        if is_loading && nothing_visible {
            Some(EmptyState {
                title: "Searching...".to_string(),
                hint: "Fetching results from Google Books.".to_string(),
            })
        } else if nothing_visible && self.view_mode == ViewMode::Discover && !self.is_remote_active() {
            Some(EmptyState {
                title: "Search to discover books".to_string(),
                hint: "Type a title, author or subject to query Google Books.".to_string(),
            })
        } else if nothing_visible && !self.search_query.is_empty() {
            Some(EmptyState {
                title: format!("No books match \"{}\"", self.search_query),
                hint: "Try a different search term or check your collection.".to_string(),
            })
        } else if self.entries.is_empty() && !is_loading {
            Some(EmptyState {
                title: "Your library is empty".to_string(),
                hint: "Add your first book to get started.".to_string(),
            })
        } else {
            None
        }
    }

    fn compute_footer(&self, filtered: usize) -> FooterInfo {
        let message = if self.is_loading() {
            Some("Loading more...".to_string())
        } else if self.has_more() {
            Some("More available, type `more` to load".to_string())
        } else if self.view_mode == ViewMode::Discover && !self.is_remote_active() {
            Some("Search Google Books to discover titles".to_string())
        } else if filtered > 0 {
            Some(format!("You've seen all {filtered} books"))
        } else {
            None
        };

        let keybindings = match self.view_mode {
            ViewMode::Local => {
                "search <q>  sort <field>  dir  more  add  edit <n>  rm <n>  lend <n>  return <n>  discover  quit"
            }
            ViewMode::Discover => "search <q>  sort relevance|newest  more  show <n>  own <n>  local  quit",
        };

        FooterInfo {
            message,
            keybindings: keybindings.to_string(),
        }
    }
}

fn matches_query(entry: &CatalogEntry, lowered_query: &str) -> bool {
    entry.title.to_lowercase().contains(lowered_query)
        || entry.authors.to_lowercase().contains(lowered_query)
        || entry.catalog_number.to_lowercase().contains(lowered_query)
}

fn sort_value(entry: &CatalogEntry, field: SortField) -> &str {
    match field {
        SortField::Title => &entry.title,
        SortField::Authors => &entry.authors,
        SortField::PublishedDate => &entry.published_date,
        SortField::CatalogNumber => &entry.catalog_number,
        SortField::Relevance | SortField::Newest => "",
    }
}

/// Case-insensitive comparison that orders accented letters next to their base letter.
///
/// Strings are compared by their lower-cased, diacritic-stripped form first and
/// by the lower-cased original only to break ties, so "Émile" sorts between
/// "Eagle" and "Fable" rather than after "Zebra".
fn collate(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    primary_key(&a_lower)
        .cmp(&primary_key(&b_lower))
        .then_with(|| a_lower.cmp(&b_lower))
}

fn primary_key(lowered: &str) -> String {
    lowered.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
