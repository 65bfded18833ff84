//! Google Books search client.
//!
//! Uses `ureq` for synchronous HTTP requests; the client runs on the search
//! worker thread, never on the thread that owns the store. The agent enforces a
//! timeout so a stalled request cannot occupy the worker forever.

use super::models::{Volume, VolumesResponse};
use super::{RemoteSearch, SearchRequest};
use crate::domain::{CatalogEntry, CatalogError, Result};
use std::time::Duration;

/// Public Google Books volumes endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Prefix of catalog numbers assigned to remote hits.
const REMOTE_CATALOG_PREFIX: &str = "GB-";

/// Number of id characters used in a remote catalog number.
const CATALOG_ID_CHARS: usize = 5;

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// HTTP client for the Google Books volumes search.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl GoogleBooksClient {
    /// Creates a client for `endpoint` with a per-request timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    fn fetch(&self, request: &SearchRequest) -> Result<VolumesResponse> {
        let response = self
            .agent
            .get(&self.endpoint)
            .query("q", &request.query)
            .query("maxResults", &request.page_size.to_string())
            .query("startIndex", &request.start_index.to_string())
            .query("orderBy", request.order_by.as_str())
            .query("printType", "books")
            .query("projection", "lite")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => CatalogError::Remote(format!("HTTP error {code}")),
                ureq::Error::Transport(transport) => {
                    CatalogError::Remote(format!("transport error: {transport}"))
                }
            })?;

        response
            .into_json::<VolumesResponse>()
            .map_err(|e| CatalogError::Remote(format!("malformed response: {e}")))
    }
}

impl RemoteSearch for GoogleBooksClient {
    fn search(&self, request: &SearchRequest) -> Result<Vec<CatalogEntry>> {
        let _span = tracing::debug_span!("google_books_search",
            query = %request.query,
            start_index = request.start_index,
            order_by = %request.order_by
        )
        .entered();

        let body = self.fetch(request)?;

        tracing::debug!(
            total_items = body.total_items,
            page_items = body.items.len(),
            "search page received"
        );

        Ok(body.items.into_iter().map(map_volume).collect())
    }
}

/// Maps a search hit to a catalog entry.
///
/// Missing titles and authors get placeholders, lists are joined with `", "`,
/// the thumbnail prefers `thumbnail` over `smallThumbnail` and is upgraded to
/// HTTPS, and the catalog number is `GB-` plus the first five id characters
/// upper-cased. Remote entries are never lent out.
///
/// # Examples
///
/// ```
/// use shelfkeeper::remote::models::Volume;
/// use shelfkeeper::remote::map_volume;
///
/// let volume = Volume { id: "zyTCAlFPjgYC".into(), ..Volume::default() };
/// let entry = map_volume(volume);
/// assert_eq!(entry.catalog_number, "GB-ZYTCA");
/// assert_eq!(entry.title, "Unknown Title");
/// assert_eq!(entry.authors, "Unknown Author");
/// ```
#[must_use]
pub fn map_volume(volume: Volume) -> CatalogEntry {
    let info = volume.volume_info;

    let raw_thumbnail = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .unwrap_or_default();
    let thumbnail = raw_thumbnail
        .strip_prefix("http://")
        .map_or(raw_thumbnail.clone(), |rest| format!("https://{rest}"));

    let id_prefix: String = volume.id.chars().take(CATALOG_ID_CHARS).collect();
    let catalog_number = format!("{REMOTE_CATALOG_PREFIX}{}", id_prefix.to_uppercase());

    let authors = info
        .authors
        .unwrap_or_else(|| vec![UNKNOWN_AUTHOR.to_string()])
        .join(", ");

    let mut entry = CatalogEntry::new(
        volume.id,
        catalog_number,
        info.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        authors,
    );
    entry.publisher = info.publisher.unwrap_or_default();
    entry.published_date = info.published_date.unwrap_or_default();
    entry.description = info.description.unwrap_or_default();
    entry.page_count = info.page_count;
    entry.categories = info.categories.unwrap_or_default().join(", ");
    entry.thumbnail = thumbnail;
    entry
}
