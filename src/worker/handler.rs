//! Worker thread implementation for remote searches.
//!
//! [`SearchWorker`] owns the remote search backend and turns each
//! [`WorkerMessage`] into a [`WorkerResponse`]. [`WorkerHandle`] runs it on a
//! dedicated thread and exposes the two channel ends to the store. Requests are
//! processed one at a time. Every posted search supersedes the ones before it,
//! so searches still queued behind a newer one are dropped unanswered; a fetch
//! already running is left to finish or time out.

use crate::domain::{CatalogError, Result};
use crate::remote::{RemoteSearch, SearchRequest};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

const WORKER_THREAD_NAME: &str = "search-worker";

/// Worker state for handling remote search requests.
pub struct SearchWorker {
    search: Box<dyn RemoteSearch>,
}

impl SearchWorker {
    #[must_use]
    pub fn new(search: Box<dyn RemoteSearch>) -> Self {
        Self { search }
    }

    /// Helper for turning a search result into a response with consistent logging.
    fn handle_search_result(
        request: SearchRequest,
        result: Result<Vec<crate::domain::CatalogEntry>>,
    ) -> WorkerResponse {
        match result {
            Ok(entries) => {
                tracing::debug!(result_count = entries.len(), "remote search successful");
                WorkerResponse::VolumesFound { request, entries }
            }
            Err(e) => {
                tracing::warn!(query = %request.query, error = %e, "remote search failed");
                WorkerResponse::SearchFailed {
                    request,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Processes a worker message and returns the appropriate response.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::SearchVolumes { request } => {
                let result = self.search.search(&request);
                Self::handle_search_result(request, result)
            }
        }
    }
}

/// Channel ends of a running search worker thread.
///
/// Dropping the handle closes the request channel, which ends the thread once
/// any request it is working on finishes.
pub struct WorkerHandle {
    requests: Sender<WorkerMessage>,
    responses: Receiver<WorkerResponse>,
}

impl WorkerHandle {
    /// Spawns `worker` on its own thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to create the thread.
    pub fn spawn(worker: SearchWorker) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<WorkerMessage>();
        let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>();

        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                tracing::debug!("search worker started");
                while let Ok(message) = request_rx.recv() {
                    let response = worker.handle_message(latest_pending(message, &request_rx));
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                tracing::debug!("search worker stopped");
            })
            .map_err(|e| CatalogError::Worker(format!("failed to spawn worker thread: {e}")))?;

        Ok(Self {
            requests: request_tx,
            responses: response_rx,
        })
    }

    /// Queues a message for the worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread has exited.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        self.requests
            .send(message)
            .map_err(|_| CatalogError::Worker("worker thread is gone".to_string()))
    }

    /// Returns a finished response without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerResponse> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("search worker disconnected");
                None
            }
        }
    }

    /// Waits up to `timeout` for the next response.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerResponse> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("search worker disconnected");
                None
            }
        }
    }
}

/// Returns the newest queued message, skipping `message` and everything
/// queued between it and the newest.
fn latest_pending(mut message: WorkerMessage, queue: &Receiver<WorkerMessage>) -> WorkerMessage {
    while let Ok(newer) = queue.try_recv() {
        tracing::debug!(skipped = ?message, "dropping superseded search");
        message = newer;
    }
    message
}
