//! Storage layer for the persisted catalog and preferences.
//!
//! This module provides the storage abstraction the store writes through after
//! every catalog mutation, and the starter catalog used when nothing has been
//! stored yet.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `memory`: In-memory storage for offline runs and tests
//! - `seed`: Starter catalog

pub mod backend;
pub mod json;
pub mod memory;
pub mod seed;

pub use backend::{Storage, CATALOG_KEY};
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use seed::seed_catalog;
