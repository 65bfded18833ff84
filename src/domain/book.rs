//! Catalog entry domain model and lending rules.
//!
//! A [`CatalogEntry`] is one book, either owned by the user (a member of the
//! authoritative catalog) or surfaced by the remote search. The serialized form
//! uses camelCase keys; it is the exact record written to persistent storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for due dates and full published dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// One book in the catalog.
///
/// # Fields
///
/// - `id`: Stable identifier; a UUID for locally created entries, the remote
///   volume id for entries that came from a search
/// - `catalog_number`: Shelf mark, unique among local entries (checked by the
///   form validator, not by the store)
/// - `published_date`: Free text, either `YYYY` or `YYYY-MM-DD`
/// - `page_count`: Positive page count if known
/// - `is_checked_out`, `checked_out_by`, `due_date`: The lending triple; either
///   `(false, "", "")` or `(true, <borrower>, <date>)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub catalog_number: String,
    pub title: String,
    pub authors: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub is_checked_out: bool,
    #[serde(default)]
    pub checked_out_by: String,
    #[serde(default)]
    pub due_date: String,
}

impl CatalogEntry {
    /// Creates an available entry with the required fields set and every other
    /// descriptive field empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfkeeper::CatalogEntry;
    ///
    /// let entry = CatalogEntry::new("b-1", "CS-001", "Clean Code", "Robert C. Martin");
    /// assert!(!entry.is_checked_out);
    /// assert!(entry.lending_is_consistent());
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        catalog_number: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            catalog_number: catalog_number.into(),
            title: title.into(),
            authors: authors.into(),
            publisher: String::new(),
            published_date: String::new(),
            description: String::new(),
            page_count: None,
            categories: String::new(),
            thumbnail: String::new(),
            is_checked_out: false,
            checked_out_by: String::new(),
            due_date: String::new(),
        }
    }

    /// Lends the entry out. All three lending fields change together.
    pub fn check_out(&mut self, borrower: impl Into<String>, due_date: impl Into<String>) {
        self.is_checked_out = true;
        self.checked_out_by = borrower.into();
        self.due_date = due_date.into();
    }

    /// Returns the entry, resetting the lending triple to `(false, "", "")`.
    pub fn check_in(&mut self) {
        self.is_checked_out = false;
        self.checked_out_by.clear();
        self.due_date.clear();
    }

    /// Whether the lending triple is in one of its two legal shapes.
    #[must_use]
    pub fn lending_is_consistent(&self) -> bool {
        if self.is_checked_out {
            !self.checked_out_by.is_empty() && !self.due_date.is_empty()
        } else {
            self.checked_out_by.is_empty() && self.due_date.is_empty()
        }
    }

    /// Parses the due date at day granularity.
    ///
    /// Any time-of-day suffix (`2026-03-01T12:00:00Z`) is ignored. Returns `None`
    /// when the entry has no due date or it cannot be parsed.
    #[must_use]
    pub fn due_date_parsed(&self) -> Option<NaiveDate> {
        let day = self.due_date.get(..10)?;
        NaiveDate::parse_from_str(day, ISO_DATE_FORMAT).ok()
    }

    /// Whether the entry is checked out and its due date is strictly before `today`.
    ///
    /// An unparseable due date never counts as overdue.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use shelfkeeper::CatalogEntry;
    ///
    /// let mut entry = CatalogEntry::new("b-1", "CS-001", "Clean Code", "Robert C. Martin");
    /// entry.check_out("Alice", "2026-03-01");
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// assert!(entry.is_overdue_on(today));
    /// ```
    #[must_use]
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        if !self.is_checked_out || self.due_date.is_empty() {
            return false;
        }
        self.due_date_parsed().is_some_and(|due| due < today)
    }
}
