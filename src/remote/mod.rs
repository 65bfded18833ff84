//! Remote book search.
//!
//! The discover view pulls pages of results from an external search API. This
//! module defines the [`RemoteSearch`] seam, the [`SearchRequest`] parameter
//! tuple that identifies a page, and the Google Books implementation.
//!
//! # Modules
//!
//! - `models`: Wire types of the Google Books volumes response
//! - `google_books`: HTTP client and volume-to-entry mapping

pub mod google_books;
pub mod models;

pub use google_books::{map_volume, GoogleBooksClient, DEFAULT_ENDPOINT};

use crate::app::modes::SortField;
use crate::domain::{CatalogEntry, Result};
use serde::{Deserialize, Serialize};

/// Parameters of one remote page fetch.
///
/// Responses are keyed by the request that produced them: a response is only
/// applied while its request still equals the view's current request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Trimmed, non-empty query text.
    pub query: String,

    /// Maximum number of results in the page.
    pub page_size: usize,

    /// Offset of the first result.
    pub start_index: usize,

    /// Server-side order (`Relevance` or `Newest`).
    pub order_by: SortField,
}

/// A source of remote search results.
///
/// Implementations run on the search worker thread, so they must be `Send`.
pub trait RemoteSearch: Send {
    /// Fetches one page of results, already mapped to catalog entries.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, non-success responses or
    /// malformed payloads. The store treats any error as an empty page.
    fn search(&self, request: &SearchRequest) -> Result<Vec<CatalogEntry>>;
}

/// Remote search that never finds anything. Used when running offline.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSearch;

impl RemoteSearch for OfflineSearch {
    fn search(&self, request: &SearchRequest) -> Result<Vec<CatalogEntry>> {
        tracing::debug!(query = %request.query, "offline, returning empty page");
        Ok(Vec::new())
    }
}
