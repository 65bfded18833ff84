//! Entry form drafts and the validation boundary.
//!
//! The store never rejects a duplicate catalog number on write; uniqueness is
//! enforced here, before an [`EntryDraft`] is committed as a [`CatalogEntry`].
//! Callers supply the uniqueness lookup, normally
//! [`CollectionStore::is_catalog_number_taken`](crate::store::CollectionStore::is_catalog_number_taken)
//! with the id of the entry being edited excluded.

use crate::domain::book::{CatalogEntry, ISO_DATE_FORMAT};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static YEAR_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));
static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

const MIN_YEAR: u32 = 1000;
const MAX_YEAR: u32 = 2099;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Title is required")]
    TitleRequired,
    #[error("At least one author is required")]
    AuthorsRequired,
    #[error("Catalog number is required")]
    CatalogNumberRequired,
    #[error("Catalog number already in use")]
    CatalogNumberTaken,
    #[error("Use 2026 or 2026-03-15")]
    InvalidPublishedDate,
    #[error("Page count must be at least 1")]
    PageCountTooSmall,
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    #[must_use]
    pub fn contains(&self, error: &FieldError) -> bool {
        self.0.contains(error)
    }
}

/// Editable descriptive fields of an entry, as entered in the add/edit form.
///
/// Lending state is not part of the draft: new entries start available and
/// edits keep whatever lending state the original had.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub authors: String,
    pub catalog_number: String,
    pub published_date: String,
    pub publisher: String,
    pub page_count: Option<i64>,
    pub categories: String,
    pub thumbnail: String,
    pub description: String,
}

impl EntryDraft {
    /// Pre-fills a draft from an existing entry for editing.
    #[must_use]
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            title: entry.title.clone(),
            authors: entry.authors.clone(),
            catalog_number: entry.catalog_number.clone(),
            published_date: entry.published_date.clone(),
            publisher: entry.publisher.clone(),
            page_count: entry.page_count.map(i64::from),
            categories: entry.categories.clone(),
            thumbnail: entry.thumbnail.clone(),
            description: entry.description.clone(),
        }
    }

    /// Validates the draft.
    ///
    /// `is_catalog_number_taken` is only consulted when a catalog number was
    /// entered.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate<F>(&self, is_catalog_number_taken: F) -> Result<(), FormErrors>
    where
        F: FnOnce(&str) -> bool,
    {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::TitleRequired);
        }
        if self.authors.trim().is_empty() {
            errors.push(FieldError::AuthorsRequired);
        }
        let catalog_number = self.catalog_number.trim();
        if catalog_number.is_empty() {
            errors.push(FieldError::CatalogNumberRequired);
        } else if is_catalog_number_taken(catalog_number) {
            errors.push(FieldError::CatalogNumberTaken);
        }
        if !is_valid_published_date(&self.published_date) {
            errors.push(FieldError::InvalidPublishedDate);
        }
        if self.page_count.is_some_and(|n| n < 1) {
            errors.push(FieldError::PageCountTooSmall);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(error_count = errors.len(), "entry draft rejected");
            Err(FormErrors(errors))
        }
    }

    /// Commits the draft as an entry.
    ///
    /// With `existing`, the id and lending triple are carried over; otherwise a
    /// fresh UUID v4 is assigned and the entry starts available.
    #[must_use]
    pub fn into_entry(self, existing: Option<&CatalogEntry>) -> CatalogEntry {
        let id = existing.map_or_else(|| uuid::Uuid::new_v4().to_string(), |e| e.id.clone());
        let catalog_number = self.catalog_number.trim().to_string();
        let mut entry = CatalogEntry::new(id, catalog_number, self.title, self.authors);
        entry.publisher = self.publisher;
        entry.published_date = self.published_date;
        entry.description = self.description;
        entry.page_count = self.page_count.and_then(|n| u32::try_from(n).ok()).filter(|n| *n > 0);
        entry.categories = self.categories;
        entry.thumbnail = self.thumbnail;

        if let Some(existing) = existing {
            entry.is_checked_out = existing.is_checked_out;
            entry.checked_out_by.clone_from(&existing.checked_out_by);
            entry.due_date.clone_from(&existing.due_date);
        }
        entry
    }
}

/// Checks a published date: empty, a year in 1000..=2099, or a real `YYYY-MM-DD` date.
///
/// # Examples
///
/// ```
/// use shelfkeeper::domain::validation::is_valid_published_date;
///
/// assert!(is_valid_published_date(""));
/// assert!(is_valid_published_date("2008"));
/// assert!(is_valid_published_date("2024-02-29"));
/// assert!(!is_valid_published_date("2023-02-29"));
/// assert!(!is_valid_published_date("999"));
/// assert!(!is_valid_published_date("March 2008"));
/// ```
#[must_use]
pub fn is_valid_published_date(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    if YEAR_ONLY.is_match(value) {
        return value
            .parse::<u32>()
            .is_ok_and(|year| (MIN_YEAR..=MAX_YEAR).contains(&year));
    }

    if FULL_DATE.is_match(value) {
        return NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).is_ok();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EntryDraft {
        EntryDraft {
            title: "Clean Code".into(),
            authors: "Robert C. Martin".into(),
            catalog_number: "CS-010".into(),
            published_date: "2008".into(),
            ..EntryDraft::default()
        }
    }

    #[test]
    fn accepts_complete_draft() {
        assert_eq!(draft().validate(|_| false), Ok(()));
    }

    #[test]
    fn reports_all_missing_required_fields() {
        let errors = EntryDraft::default().validate(|_| false).unwrap_err();
        assert!(errors.contains(&FieldError::TitleRequired));
        assert!(errors.contains(&FieldError::AuthorsRequired));
        assert!(errors.contains(&FieldError::CatalogNumberRequired));
        assert_eq!(errors.0.len(), 3);
    }

    #[test]
    fn rejects_taken_catalog_number() {
        let errors = draft().validate(|number| number == "CS-010").unwrap_err();
        assert_eq!(errors.0, vec![FieldError::CatalogNumberTaken]);
    }

    #[test]
    fn catalog_number_is_trimmed_for_lookup_and_storage() {
        let mut padded = draft();
        padded.catalog_number = "  CS-010 ".into();

        let errors = padded.validate(|number| number == "CS-010").unwrap_err();
        assert_eq!(errors.0, vec![FieldError::CatalogNumberTaken]);
        assert_eq!(padded.into_entry(None).catalog_number, "CS-010");
    }

    #[test]
    fn rejects_bad_published_date_and_page_count() {
        let mut bad = draft();
        bad.published_date = "2100".into();
        bad.page_count = Some(0);
        let errors = bad.validate(|_| false).unwrap_err();
        assert_eq!(
            errors.0,
            vec![FieldError::InvalidPublishedDate, FieldError::PageCountTooSmall]
        );
    }

    #[test]
    fn published_date_rules() {
        assert!(is_valid_published_date("1000"));
        assert!(is_valid_published_date("2099"));
        assert!(!is_valid_published_date("0999"));
        assert!(!is_valid_published_date("2026-13-01"));
        assert!(!is_valid_published_date("2026-1-01"));
        assert!(is_valid_published_date("2026-03-15"));
    }

    #[test]
    fn new_entry_gets_fresh_id_and_no_lending_state() {
        let a = draft().into_entry(None);
        let b = draft().into_entry(None);
        assert_ne!(a.id, b.id);
        assert!(!a.is_checked_out);
        assert!(a.lending_is_consistent());
        assert_eq!(a.published_date, "2008");
    }

    #[test]
    fn edit_keeps_id_and_lending_state() {
        let mut original = CatalogEntry::new("keep-me", "CS-010", "Old", "Someone");
        original.check_out("Bob", "2026-03-01");

        let mut edited = EntryDraft::from_entry(&original);
        edited.title = "New".into();
        let entry = edited.into_entry(Some(&original));

        assert_eq!(entry.id, "keep-me");
        assert_eq!(entry.title, "New");
        assert!(entry.is_checked_out);
        assert_eq!(entry.checked_out_by, "Bob");
        assert_eq!(entry.due_date, "2026-03-01");
    }
}
