//! Application layer coordinating state, events, and actions.
//!
//! This module defines the core logic of the collection view, sitting between
//! the store runtime ([`crate::store`]) and the domain/storage/worker layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Intents → Events → Event Handler → State Mutations → Actions → Side Effects
//!                          ↑                                          ↓
//!                          └───────────── Worker Responses ───────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: View mode and sort types
//! - [`state`]: State snapshot, derivations and view model computation
//!
//! # Example
//!
//! ```rust
//! use shelfkeeper::app::{handle_event, CollectionState, Event};
//!
//! let mut state = CollectionState::new(vec![]);
//! let (render, actions) = handle_event(&mut state, &Event::SetSearchQuery("clean".into()))?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), shelfkeeper::CatalogError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::{Action, Notification, NotificationTone};
pub use handler::{handle_event, Event};
pub use modes::{SortDirection, SortField, ViewMode};
pub use state::{CollectionState, RemotePager, BATCH_SIZE, PAGE_SIZE};
