//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user intents and
//! worker responses, translating them into state changes and action sequences.
//! It is the only place the state cells of [`CollectionState`] change.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Intents arrive from the presentation layer, responses from the worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State cells are mutated in place
//! 4. Actions are collected and returned for execution by the store
//!
//! # Event Types
//!
//! - **Catalog**: `AddEntry`, `UpdateEntry`, `DeleteEntry`
//! - **Lending**: `CheckOut`, `CheckIn`
//! - **View**: `SetSearchQuery`, `SetViewMode`, `SetSortField`, `SetSortDirection`
//! - **Pagination**: `LoadNextPage`, `ResetVisibleWindow`
//! - **Worker**: `WorkerResponse` with the page a search produced
//!
//! # Request Supersession
//!
//! Every remote fetch is tagged with its full [`SearchRequest`](crate::remote::SearchRequest).
//! A response is applied only while its request still equals
//! [`CollectionState::current_request`]; anything else is a leftover of a query,
//! sort or cursor the user has since moved away from and is dropped.
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::app::{handle_event, Action, CollectionState, Event};
//! use shelfkeeper::CatalogEntry;
//!
//! let mut state = CollectionState::new(vec![]);
//! let entry = CatalogEntry::new("b-1", "CS-001", "Clean Code", "Robert C. Martin");
//! let (render, actions) = handle_event(&mut state, &Event::AddEntry(entry))?;
//! assert!(render);
//! assert_eq!(actions[0], Action::PersistCatalog);
//! # Ok::<(), shelfkeeper::CatalogError>(())
//! ```

use super::actions::Notification;
use super::modes::{SortDirection, SortField, ViewMode};
use super::state::{BATCH_SIZE, PAGE_SIZE};
use crate::app::{Action, CollectionState};
use crate::domain::{CatalogEntry, CatalogError, Result};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Intents from the presentation layer and responses from the search worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Prepends a fully formed entry to the catalog.
    AddEntry(CatalogEntry),

    /// Replaces the catalog member with the same id. No-op if absent.
    UpdateEntry(CatalogEntry),

    /// Removes the catalog member with this id. No-op if absent.
    DeleteEntry { id: String },

    /// Lends the member out. No-op if absent.
    CheckOut {
        id: String,
        borrower: String,
        due_date: String,
    },

    /// Returns the member. No-op if absent.
    CheckIn { id: String },

    /// Replaces the search text.
    SetSearchQuery(String),

    /// Switches between the local catalog and remote discovery.
    SetViewMode(ViewMode),

    /// Sets the sort cell the field belongs to.
    SetSortField(SortField),

    /// Sets the local sort direction.
    SetSortDirection(SortDirection),

    /// Reveals the next local batch or requests the next remote page.
    LoadNextPage,

    /// Shrinks the local window back to the first batch.
    ResetVisibleWindow,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// The returned flag says whether anything visible changed and the view should
/// be redrawn.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidEntry`] when an added or updated entry has
/// an inconsistent lending triple, and [`CatalogError::Validation`] when a
/// check-out lacks a borrower or due date. State is left untouched in both cases.
pub fn handle_event(state: &mut CollectionState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::AddEntry(entry) => {
            ensure_consistent_lending(entry)?;
            tracing::debug!(entry_id = %entry.id, catalog_number = %entry.catalog_number, "adding entry");

            state.entries.insert(0, entry.clone());
            Ok((
                true,
                vec![Action::PersistCatalog, Action::Notify(Notification::added(&entry.title))],
            ))
        }
        Event::UpdateEntry(entry) => {
            ensure_consistent_lending(entry)?;

            let Some(position) = state.position_of(&entry.id) else {
                tracing::debug!(entry_id = %entry.id, "update for unknown entry ignored");
                return Ok((false, vec![]));
            };

            state.entries[position] = entry.clone();
            Ok((
                true,
                vec![Action::PersistCatalog, Action::Notify(Notification::updated(&entry.title))],
            ))
        }
        Event::DeleteEntry { id } => {
            let Some(position) = state.position_of(id) else {
                tracing::debug!(entry_id = %id, "delete for unknown entry ignored");
                return Ok((false, vec![]));
            };

            let removed = state.entries.remove(position);
            Ok((
                true,
                vec![Action::PersistCatalog, Action::Notify(Notification::removed(&removed.title))],
            ))
        }
        Event::CheckOut { id, borrower, due_date } => {
            if borrower.trim().is_empty() {
                return Err(CatalogError::Validation("borrower is required".to_string()));
            }
            if due_date.trim().is_empty() {
                return Err(CatalogError::Validation("due date is required".to_string()));
            }

            let Some(entry) = state.entries.iter_mut().find(|e| &e.id == id) else {
                tracing::debug!(entry_id = %id, "check-out for unknown entry ignored");
                return Ok((false, vec![]));
            };

            entry.check_out(borrower.trim(), due_date.trim());
            tracing::debug!(entry_id = %id, due_date = %entry.due_date, "entry checked out");

            let notification = Notification::checked_out(&entry.title, &entry.checked_out_by);
            Ok((true, vec![Action::PersistCatalog, Action::Notify(notification)]))
        }
        Event::CheckIn { id } => {
            let Some(entry) = state.entries.iter_mut().find(|e| &e.id == id) else {
                tracing::debug!(entry_id = %id, "check-in for unknown entry ignored");
                return Ok((false, vec![]));
            };

            entry.check_in();
            Ok((
                true,
                vec![Action::PersistCatalog, Action::Notify(Notification::checked_in(&entry.title))],
            ))
        }
        Event::SetSearchQuery(query) => {
            if &state.search_query == query {
                return Ok((false, vec![]));
            }

            let previous_request = state.current_request();
            state.search_query.clone_from(query);
            state.remote.cursor = 0;

            tracing::trace!(query = %state.search_query, "search query updated");

            if state.trimmed_query().is_empty() {
                state.remote.clear();
                return Ok((true, vec![]));
            }

            let actions = if state.current_request() == previous_request {
                vec![]
            } else {
                issue_fetch(state)
            };
            Ok((true, actions))
        }
        Event::SetViewMode(mode) => {
            if state.view_mode == *mode {
                return Ok((false, vec![]));
            }

            tracing::debug!(from = ?state.view_mode, to = ?mode, "switching view mode");
            state.reset_view(*mode);
            Ok((true, vec![]))
        }
        Event::SetSortField(field) => match field.scope() {
            ViewMode::Local => {
                if state.local_sort_field == *field {
                    return Ok((false, vec![]));
                }
                state.local_sort_field = *field;
                Ok((state.view_mode == ViewMode::Local, vec![]))
            }
            ViewMode::Discover => {
                if state.discover_sort_field == *field {
                    return Ok((false, vec![]));
                }
                state.discover_sort_field = *field;
                state.remote.cursor = 0;
                let actions = issue_fetch(state);
                Ok((state.view_mode == ViewMode::Discover, actions))
            }
        },
        Event::SetSortDirection(direction) => {
            if state.sort_direction == *direction {
                return Ok((false, vec![]));
            }
            state.sort_direction = *direction;
            Ok((state.view_mode == ViewMode::Local, vec![]))
        }
        Event::LoadNextPage => {
            if state.is_remote_active() {
                if state.is_loading() || !state.remote.more_likely {
                    tracing::debug!(
                        loading = state.is_loading(),
                        more_likely = state.remote.more_likely,
                        "next remote page not requested"
                    );
                    return Ok((false, vec![]));
                }

                state.remote.cursor += PAGE_SIZE;
                let actions = issue_fetch(state);
                return Ok((true, actions));
            }

            if state.view_mode == ViewMode::Local {
                state.revealed_count += BATCH_SIZE;
                tracing::debug!(revealed_count = state.revealed_count, "revealed next batch");
                return Ok((true, vec![]));
            }

            Ok((false, vec![]))
        }
        Event::ResetVisibleWindow => {
            let changed = state.revealed_count != BATCH_SIZE;
            state.revealed_count = BATCH_SIZE;
            Ok((changed, vec![]))
        }
        Event::WorkerResponse(response) => {
            let was_loading = state.is_loading();
            let applied = match response {
                WorkerResponse::VolumesFound { request, entries } => {
                    state.apply_search_page(request, entries.clone())
                }
                WorkerResponse::SearchFailed { request, message } => {
                    tracing::debug!(error = %message, "search failed, applying empty page");
                    state.apply_search_page(request, Vec::new())
                }
            };
            Ok((applied || was_loading != state.is_loading(), vec![]))
        }
    }
}

/// Marks the current request as in flight and asks the worker for it.
///
/// Returns no actions when remote search is inactive.
fn issue_fetch(state: &mut CollectionState) -> Vec<Action> {
    let Some(request) = state.current_request() else {
        return vec![];
    };

    tracing::debug!(
        query = %request.query,
        start_index = request.start_index,
        order_by = %request.order_by,
        "requesting remote page"
    );

    state.remote.in_flight = Some(request.clone());
    vec![Action::PostToWorker(WorkerMessage::search_volumes(request))]
}

fn ensure_consistent_lending(entry: &CatalogEntry) -> Result<()> {
    if entry.lending_is_consistent() {
        Ok(())
    } else {
        Err(CatalogError::InvalidEntry {
            id: entry.id.clone(),
            reason: "lending fields must be all set or all empty".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NotificationTone;
    use crate::remote::SearchRequest;

    fn entry(id: &str, title: &str, catalog: &str) -> CatalogEntry {
        CatalogEntry::new(id, catalog, title, "Author")
    }

    fn shelf() -> CollectionState {
        CollectionState::new(vec![
            entry("1", "Clean Code", "CS-001"),
            entry("2", "Design Patterns", "CS-002"),
            entry("3", "Refactoring", "CS-003"),
        ])
    }

    fn discover(query: &str) -> (CollectionState, SearchRequest) {
        let mut state = shelf();
        handle_event(&mut state, &Event::SetViewMode(ViewMode::Discover)).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::SetSearchQuery(query.into())).unwrap();
        let request = posted_request(&actions);
        (state, request)
    }

    fn posted_request(actions: &[Action]) -> SearchRequest {
        match actions {
            [Action::PostToWorker(WorkerMessage::SearchVolumes { request })] => request.clone(),
            other => panic!("expected a single search, got {other:?}"),
        }
    }

    fn hits(prefix: &str, count: usize) -> Vec<CatalogEntry> {
        (0..count).map(|i| entry(&format!("{prefix}{i}"), &format!("{prefix} {i}"), "GB-X")).collect()
    }

    fn found(request: &SearchRequest, entries: Vec<CatalogEntry>) -> Event {
        Event::WorkerResponse(WorkerResponse::VolumesFound {
            request: request.clone(),
            entries,
        })
    }

    #[test]
    fn add_entry_prepends_and_notifies() {
        let mut state = shelf();
        let new = entry("4", "Working Effectively", "CS-004");
        let (render, actions) = handle_event(&mut state, &Event::AddEntry(new)).unwrap();

        assert!(render);
        assert!(state.is_in_library("4"));
        assert_eq!(state.filtered_entries().len(), 4);
        assert_eq!(state.entries[0].id, "4");
        assert_eq!(
            actions,
            vec![
                Action::PersistCatalog,
                Action::Notify(Notification::new(
                    NotificationTone::Success,
                    "\"Working Effectively\" added to library"
                )),
            ]
        );
    }

    #[test]
    fn add_entry_rejects_half_lent_entry() {
        let mut state = shelf();
        let mut bad = entry("4", "Bad", "CS-004");
        bad.checked_out_by = "Alice".into();

        let result = handle_event(&mut state, &Event::AddEntry(bad));
        assert!(matches!(result, Err(CatalogError::InvalidEntry { .. })));
        assert_eq!(state.entries.len(), 3);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut state = shelf();
        let before = state.entries.clone();
        let mut edited = before[1].clone();
        edited.title = "Design Patterns, 2nd ed.".into();

        let (_, actions) = handle_event(&mut state, &Event::UpdateEntry(edited.clone())).unwrap();

        assert_eq!(state.entries.len(), 3);
        assert_eq!(state.entries[1], edited);
        assert_eq!(state.entries[0], before[0]);
        assert_eq!(state.entries[2], before[2]);
        assert_eq!(
            actions[1],
            Action::Notify(Notification::updated("Design Patterns, 2nd ed."))
        );
    }

    #[test]
    fn missing_ids_are_full_noops() {
        let mut state = shelf();
        let before = state.clone();

        for event in [
            Event::UpdateEntry(entry("nope", "Ghost", "X")),
            Event::DeleteEntry { id: "nope".into() },
            Event::CheckOut {
                id: "nope".into(),
                borrower: "Alice".into(),
                due_date: "2026-03-01".into(),
            },
            Event::CheckIn { id: "nope".into() },
        ] {
            assert_eq!(handle_event(&mut state, &event).unwrap(), (false, vec![]));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut state = shelf();
        let (_, actions) = handle_event(&mut state, &Event::DeleteEntry { id: "2".into() }).unwrap();

        let ids: Vec<&str> = state.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(
            actions[1],
            Action::Notify(Notification::new(
                NotificationTone::Danger,
                "\"Design Patterns\" removed from library"
            ))
        );
    }

    #[test]
    fn check_out_then_check_in() {
        let mut state = shelf();
        let (_, actions) = handle_event(
            &mut state,
            &Event::CheckOut {
                id: "1".into(),
                borrower: "Alice".into(),
                due_date: "2026-03-01".into(),
            },
        )
        .unwrap();

        let lent = state.find("1").unwrap();
        assert!(lent.is_checked_out);
        assert_eq!(lent.checked_out_by, "Alice");
        assert_eq!(lent.due_date, "2026-03-01");
        assert_eq!(state.entries[1], entry("2", "Design Patterns", "CS-002"));
        assert_eq!(
            actions[1],
            Action::Notify(Notification::checked_out("Clean Code", "Alice"))
        );

        handle_event(&mut state, &Event::CheckIn { id: "1".into() }).unwrap();
        assert_eq!(state.entries[0], entry("1", "Clean Code", "CS-001"));
    }

    #[test]
    fn check_out_requires_borrower_and_due_date() {
        let mut state = shelf();
        let no_borrower = Event::CheckOut {
            id: "1".into(),
            borrower: "  ".into(),
            due_date: "2026-03-01".into(),
        };
        let no_due = Event::CheckOut {
            id: "1".into(),
            borrower: "Alice".into(),
            due_date: String::new(),
        };

        assert!(matches!(handle_event(&mut state, &no_borrower), Err(CatalogError::Validation(_))));
        assert!(matches!(handle_event(&mut state, &no_due), Err(CatalogError::Validation(_))));
        assert!(!state.entries[0].is_checked_out);
    }

    #[test]
    fn load_next_page_reveals_local_batch() {
        let entries = (0..12).map(|i| entry(&i.to_string(), &format!("Book {i:02}"), "C")).collect();
        let mut state = CollectionState::new(entries);
        assert!(state.has_more());

        handle_event(&mut state, &Event::LoadNextPage).unwrap();
        assert_eq!(state.visible_entries().len(), 12);
        assert!(!state.has_more());
    }

    #[test]
    fn reset_visible_window_is_idempotent() {
        let mut state = shelf();
        state.revealed_count = 40;

        handle_event(&mut state, &Event::ResetVisibleWindow).unwrap();
        let once = state.revealed_count;
        let (render, _) = handle_event(&mut state, &Event::ResetVisibleWindow).unwrap();

        assert_eq!(once, BATCH_SIZE);
        assert_eq!(state.revealed_count, once);
        assert!(!render);
    }

    #[test]
    fn local_query_does_not_fetch() {
        let mut state = shelf();
        let (render, actions) = handle_event(&mut state, &Event::SetSearchQuery("clean".into())).unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn discover_query_fetches_first_page() {
        let (state, request) = discover("  rust  ");
        assert_eq!(request.query, "rust");
        assert_eq!(request.page_size, PAGE_SIZE);
        assert_eq!(request.start_index, 0);
        assert_eq!(request.order_by, SortField::Relevance);
        assert!(state.is_loading());
        assert!(state.has_more());
    }

    #[test]
    fn whitespace_only_change_does_not_refetch() {
        let (mut state, _) = discover("rust");
        let (_, actions) = handle_event(&mut state, &Event::SetSearchQuery("rust ".into())).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn paging_appends_and_dedups() {
        let (mut state, first) = discover("rust");
        handle_event(&mut state, &found(&first, hits("a", PAGE_SIZE))).unwrap();
        assert_eq!(state.visible_entries().len(), PAGE_SIZE);
        assert!(state.has_more());

        let (_, actions) = handle_event(&mut state, &Event::LoadNextPage).unwrap();
        let second = posted_request(&actions);
        assert_eq!(second.start_index, PAGE_SIZE);

        // In flight: further scrolls are ignored.
        assert_eq!(handle_event(&mut state, &Event::LoadNextPage).unwrap(), (false, vec![]));

        let mut page = hits("a", 3);
        page.extend(hits("b", 4));
        handle_event(&mut state, &found(&second, page)).unwrap();

        assert_eq!(state.visible_entries().len(), PAGE_SIZE + 4);
        assert!(!state.has_more());
        assert_eq!(handle_event(&mut state, &Event::LoadNextPage).unwrap(), (false, vec![]));
    }

    #[test]
    fn late_response_for_old_query_is_discarded() {
        let (mut state, old) = discover("ru");
        let (_, actions) = handle_event(&mut state, &Event::SetSearchQuery("rust".into())).unwrap();
        let new = posted_request(&actions);

        handle_event(&mut state, &found(&new, hits("new", 5))).unwrap();
        let (render, _) = handle_event(&mut state, &found(&old, hits("old", PAGE_SIZE))).unwrap();

        assert!(!render);
        assert_eq!(state.remote.results, hits("new", 5));
        assert!(!state.remote.more_likely);
        assert!(!state.is_loading());
    }

    #[test]
    fn superseded_response_does_not_clear_newer_in_flight() {
        let (mut state, old) = discover("ru");
        handle_event(&mut state, &Event::SetSearchQuery("rust".into())).unwrap();

        handle_event(&mut state, &found(&old, hits("old", 3))).unwrap();
        assert!(state.is_loading());
        assert!(state.remote.results.is_empty());
    }

    #[test]
    fn failed_search_is_an_empty_page() {
        let (mut state, request) = discover("rust");
        state.remote.results = hits("stale", 2);
        handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::SearchFailed {
                request,
                message: "HTTP error 500".into(),
            }),
        )
        .unwrap();

        assert!(state.remote.results.is_empty());
        assert!(!state.has_more());
        assert!(!state.is_loading());
    }

    #[test]
    fn clearing_query_drops_remote_results() {
        let (mut state, request) = discover("rust");
        handle_event(&mut state, &found(&request, hits("a", 5))).unwrap();

        handle_event(&mut state, &Event::SetSearchQuery("   ".into())).unwrap();
        assert!(state.remote.results.is_empty());
        assert!(!state.is_loading());
        assert!(state.visible_entries().is_empty());
    }

    #[test]
    fn new_query_keeps_old_results_until_page_arrives() {
        let (mut state, request) = discover("rust");
        handle_event(&mut state, &found(&request, hits("a", 5))).unwrap();

        handle_event(&mut state, &Event::SetSearchQuery("rust lang".into())).unwrap();
        assert_eq!(state.remote.results.len(), 5);
        assert_eq!(state.remote.cursor, 0);
    }

    #[test]
    fn discover_sort_change_refetches_from_start() {
        let (mut state, request) = discover("rust");
        handle_event(&mut state, &found(&request, hits("a", PAGE_SIZE))).unwrap();
        handle_event(&mut state, &Event::LoadNextPage).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::SetSortField(SortField::Newest)).unwrap();
        let resorted = posted_request(&actions);
        assert_eq!(resorted.start_index, 0);
        assert_eq!(resorted.order_by, SortField::Newest);
        assert_eq!(state.local_sort_field, SortField::Title);
    }

    #[test]
    fn local_sort_field_does_not_touch_discover_cell() {
        let mut state = shelf();
        let (_, actions) = handle_event(&mut state, &Event::SetSortField(SortField::Authors)).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.local_sort_field, SortField::Authors);
        assert_eq!(state.discover_sort_field, SortField::Relevance);
    }

    #[test]
    fn mode_switch_resets_view_cells() {
        let mut state = shelf();
        handle_event(&mut state, &Event::SetSearchQuery("clean".into())).unwrap();
        handle_event(&mut state, &Event::SetSortField(SortField::Authors)).unwrap();
        handle_event(&mut state, &Event::SetSortDirection(SortDirection::Desc)).unwrap();
        handle_event(&mut state, &Event::LoadNextPage).unwrap();

        handle_event(&mut state, &Event::SetViewMode(ViewMode::Discover)).unwrap();

        assert_eq!(state.search_query, "");
        assert_eq!(state.local_sort_field, SortField::LOCAL_DEFAULT);
        assert_eq!(state.discover_sort_field, SortField::DISCOVER_DEFAULT);
        assert_eq!(state.sort_direction, SortDirection::Asc);
        assert_eq!(state.revealed_count, BATCH_SIZE);
        assert_eq!(state.remote.cursor, 0);
    }

    #[test]
    fn response_after_mode_switch_is_discarded() {
        let (mut state, request) = discover("rust");
        handle_event(&mut state, &Event::SetViewMode(ViewMode::Local)).unwrap();

        handle_event(&mut state, &found(&request, hits("a", 5))).unwrap();
        assert!(state.remote.results.is_empty());
        assert_eq!(state.filtered_entries().len(), 3);
    }
}
