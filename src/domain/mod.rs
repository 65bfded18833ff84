//! Domain layer for the catalog.
//!
//! This module contains the core domain types and business rules, independent of
//! storage, networking or presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: The `CatalogEntry` model and lending rules
//! - [`validation`]: Entry form drafts and the validation boundary
//!
//! # Examples
//!
//! ```
//! use shelfkeeper::domain::{CatalogEntry, Result};
//!
//! fn create_entry() -> Result<CatalogEntry> {
//!     Ok(CatalogEntry::new("b-1", "CS-010", "Refactoring", "Martin Fowler"))
//! }
//! # assert!(create_entry().is_ok());
//! ```

pub mod book;
pub mod error;
pub mod validation;

pub use book::CatalogEntry;
pub use error::{CatalogError, Result};
pub use validation::{EntryDraft, FieldError, FormErrors};
