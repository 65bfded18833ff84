//! View model types representing renderable collection state.
//!
//! View models are computed from a state snapshot via
//! `CollectionState::compute_viewmodel()` and consumed by the renderer. They
//! contain no business logic, only display-ready data.
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::app::CollectionState;
//! use chrono::NaiveDate;
//!
//! let state = CollectionState::new(vec![]);
//! let vm = state.compute_viewmodel(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
//! assert!(vm.items.is_empty());
//! assert_eq!(vm.empty_state.unwrap().title, "Your library is empty");
//! ```

/// Complete view model for one frame of the collection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionViewModel {
    /// Mode title.
    pub header: HeaderInfo,

    /// Counts line, e.g. "Showing 10 of 12 books".
    pub summary: String,

    /// Whether a remote page is being fetched.
    pub is_loading: bool,

    /// Entries in the visible window, in display order.
    pub items: Vec<DisplayItem>,

    /// Placeholder shown instead of the list when there is nothing to show.
    pub empty_state: Option<EmptyState>,

    /// Message below the list and command hints.
    pub footer: FooterInfo,
}

/// Header bar content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Ownership and lending badge of a listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    /// Owned and on the shelf.
    Available,
    /// Owned and lent out.
    CheckedOut {
        borrower: String,
        due_date: String,
        overdue: bool,
    },
    /// Remote search hit that is not in the library.
    External,
}

/// Display information for a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// One-based position in the visible window, used to address the entry from commands.
    pub position: usize,
    pub id: String,
    pub title: String,
    pub authors: String,
    pub catalog_number: String,
    pub published_date: String,
    pub badge: Badge,
}

/// Empty-list placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub hint: String,
}

/// Footer content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// End-of-list or "more available" message, if any.
    pub message: Option<String>,

    /// Command hints for the current mode.
    pub keybindings: String,
}
