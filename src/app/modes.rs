//! View mode and sort state types for the collection view.
//!
//! These enums are the small, copyable cells of the view configuration. They
//! determine which data source feeds the list and how it is ordered.
//!
//! # State Machine
//!
//! The view operates in one of two modes:
//! - **Local**: The user's own catalog, filtered and sorted client-side
//! - **Discover**: Remote search results, ordered server-side
//!
//! Each mode owns its own sort cell; [`SortField::scope`] says which one a field
//! belongs to.
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::app::modes::{SortField, ViewMode};
//!
//! assert_eq!(SortField::Title.scope(), ViewMode::Local);
//! assert_eq!(SortField::Newest.scope(), ViewMode::Discover);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which data source the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// The authoritative local catalog.
    #[default]
    Local,

    /// Remote search results, with owned titles substituted by their local record.
    Discover,
}

/// Sort keys for both view modes.
///
/// `Title`, `Authors`, `PublishedDate` and `CatalogNumber` order the local
/// catalog; `Relevance` and `Newest` are passed to the remote search as its
/// `orderBy` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Title,
    Authors,
    PublishedDate,
    CatalogNumber,
    Relevance,
    Newest,
}

impl SortField {
    /// Default sort for the local catalog.
    pub const LOCAL_DEFAULT: Self = Self::Title;

    /// Default order for remote search.
    pub const DISCOVER_DEFAULT: Self = Self::Relevance;

    /// The view mode whose sort cell this field lives in.
    #[must_use]
    pub const fn scope(self) -> ViewMode {
        match self {
            Self::Title | Self::Authors | Self::PublishedDate | Self::CatalogNumber => ViewMode::Local,
            Self::Relevance | Self::Newest => ViewMode::Discover,
        }
    }

    /// Wire name, as used by the remote `orderBy` parameter and the persisted field names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::PublishedDate => "publishedDate",
            Self::CatalogNumber => "catalogNumber",
            Self::Relevance => "relevance",
            Self::Newest => "newest",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "authors" | "author" => Ok(Self::Authors),
            "publisheddate" | "date" => Ok(Self::PublishedDate),
            "catalognumber" | "catalog" => Ok(Self::CatalogNumber),
            "relevance" => Ok(Self::Relevance),
            "newest" => Ok(Self::Newest),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

/// Sort direction for the local catalog. Ignored in discover mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}
