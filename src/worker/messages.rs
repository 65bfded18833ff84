//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the thread
//! that owns the collection store and the background thread that runs remote
//! searches. Every response echoes the [`SearchRequest`] it answers so the
//! store can tell a current page from a superseded one.

use crate::domain::CatalogEntry;
use crate::remote::SearchRequest;
use serde::{Deserialize, Serialize};

/// Messages sent from the store to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch one page of remote search results.
    SearchVolumes {
        /// Full parameter tuple of the page.
        request: SearchRequest,
    },
}

impl WorkerMessage {
    /// Create a `SearchVolumes` message for `request`.
    #[must_use]
    pub const fn search_volumes(request: SearchRequest) -> Self {
        Self::SearchVolumes { request }
    }
}

/// Responses sent from the worker thread back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A page was fetched and mapped to catalog entries.
    VolumesFound {
        /// The request this page answers.
        request: SearchRequest,

        /// Mapped results in server order.
        entries: Vec<CatalogEntry>,
    },

    /// The fetch failed; the store treats this as an empty page.
    SearchFailed {
        /// The request that failed.
        request: SearchRequest,

        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    /// The request this response answers.
    #[must_use]
    pub const fn request(&self) -> &SearchRequest {
        match self {
            Self::VolumesFound { request, .. } | Self::SearchFailed { request, .. } => request,
        }
    }
}
