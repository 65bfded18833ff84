//! Starter catalog used when nothing has been stored yet.

use crate::domain::book::ISO_DATE_FORMAT;
use crate::domain::CatalogEntry;
use chrono::{Days, NaiveDate};

/// Loan period of the seeded loan that is still running.
const SEED_LOAN_DAYS: u64 = 7;

fn thumbnail(volume_id: &str) -> String {
    format!("https://books.google.com/books/content?id={volume_id}&printsec=frontcover&img=1&zoom=1")
}

#[allow(clippy::too_many_arguments)]
fn seed_entry(
    id: &str,
    catalog_number: &str,
    title: &str,
    authors: &str,
    publisher: &str,
    published_date: &str,
    page_count: u32,
    categories: &str,
    volume_id: &str,
    description: &str,
) -> CatalogEntry {
    let mut entry = CatalogEntry::new(id, catalog_number, title, authors);
    entry.publisher = publisher.to_string();
    entry.published_date = published_date.to_string();
    entry.page_count = Some(page_count);
    entry.categories = categories.to_string();
    entry.thumbnail = thumbnail(volume_id);
    entry.description = description.to_string();
    entry
}

/// Returns the four starter entries.
///
/// One loan is due a week after `today`; the other is long overdue.
#[must_use]
pub fn seed_catalog(today: NaiveDate) -> Vec<CatalogEntry> {
    let clean_code = seed_entry(
        "seed-1",
        "CS-001",
        "Clean Code",
        "Robert C. Martin",
        "Prentice Hall",
        "2008",
        431,
        "Programming",
        "hjEFCAAAQBAJ",
        "A Handbook of Agile Software Craftsmanship. Even bad code can function, but if code isn't clean, it can bring a development organization to its knees.",
    );

    let mut pragmatic = seed_entry(
        "seed-2",
        "CS-002",
        "The Pragmatic Programmer",
        "David Thomas, Andrew Hunt",
        "Addison-Wesley",
        "2019",
        352,
        "Programming",
        "LhOlDwAAQBAJ",
        "Your journey to mastery. The classic guide to software craftsmanship, fully updated for the modern era.",
    );
    let due = today.checked_add_days(Days::new(SEED_LOAN_DAYS)).unwrap_or(today);
    pragmatic.check_out("Alice Johnson", due.format(ISO_DATE_FORMAT).to_string());

    let design_patterns = seed_entry(
        "seed-3",
        "CS-003",
        "Design Patterns",
        "Gang of Four",
        "Addison-Wesley",
        "1994",
        395,
        "Software Engineering",
        "6oHuKQe3TjQC",
        "Elements of Reusable Object-Oriented Software. The foundational reference for software design patterns.",
    );

    let mut refactoring = seed_entry(
        "seed-4",
        "CS-004",
        "Refactoring",
        "Martin Fowler",
        "Addison-Wesley",
        "2018",
        448,
        "Programming",
        "NoS9AwAAQBAJ",
        "Improving the Design of Existing Code.",
    );
    refactoring.check_out("Bob Smith", "2025-12-25");

    vec![clean_code, pragmatic, design_patterns, refactoring]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_unique_catalog_numbers_and_consistent_loans() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let seed = seed_catalog(today);

        assert_eq!(seed.len(), 4);
        let numbers: Vec<&str> = seed.iter().map(|e| e.catalog_number.as_str()).collect();
        assert_eq!(numbers, vec!["CS-001", "CS-002", "CS-003", "CS-004"]);
        assert!(seed.iter().all(CatalogEntry::lending_is_consistent));
    }

    #[test]
    fn running_loan_is_due_in_a_week() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let seed = seed_catalog(today);

        assert_eq!(seed[1].due_date, "2026-02-08");
        assert!(!seed[1].is_overdue_on(today));
        assert!(seed[3].is_overdue_on(today));
    }
}
