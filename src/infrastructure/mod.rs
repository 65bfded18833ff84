//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where shelfkeeper keeps its files and expands
//! user-supplied paths from the command line and config file.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, resolve_data_dir, DATA_DIR_ENV};
