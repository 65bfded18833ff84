//! Actions representing side effects to be executed by the store runtime.
//!
//! This module defines the [`Action`] type, which represents imperative commands
//! produced by the event handler after processing an intent or a worker
//! response. Actions bridge pure state transformations and effectful operations
//! like writing the catalog to storage, showing a notification, or handing a
//! search to the background worker.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event, allowing
//! multiple side effects to be queued atomically. The store executes them in
//! sequence.
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::app::{Action, Notification, NotificationTone};
//!
//! let actions = vec![
//!     Action::PersistCatalog,
//!     Action::Notify(Notification::new(NotificationTone::Info, "\"Clean Code\" updated")),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::WorkerMessage;
use std::fmt;

/// Commands representing side effects to be executed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Writes the whole catalog to the storage backend.
    ///
    /// Emitted after every mutation that changed the catalog. Failures are
    /// logged and otherwise ignored.
    PersistCatalog,

    /// Shows a transient message to the user.
    Notify(Notification),

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),
}

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationTone {
    Success,
    Info,
    Warning,
    Danger,
}

impl NotificationTone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// A user-facing message about a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub tone: NotificationTone,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn new(tone: NotificationTone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn added(title: &str) -> Self {
        Self::new(NotificationTone::Success, format!("\"{title}\" added to library"))
    }

    #[must_use]
    pub fn updated(title: &str) -> Self {
        Self::new(NotificationTone::Info, format!("\"{title}\" updated"))
    }

    #[must_use]
    pub fn removed(title: &str) -> Self {
        Self::new(NotificationTone::Danger, format!("\"{title}\" removed from library"))
    }

    #[must_use]
    pub fn checked_out(title: &str, borrower: &str) -> Self {
        Self::new(
            NotificationTone::Warning,
            format!("\"{title}\" checked out to {borrower}"),
        )
    }

    #[must_use]
    pub fn checked_in(title: &str) -> Self {
        Self::new(NotificationTone::Success, format!("\"{title}\" checked back in"))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
