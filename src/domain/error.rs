//! Error types for the catalog.
//!
//! This module defines the centralized error type [`CatalogError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Most of these never reach the presentation layer: the store swallows storage
//! and remote-search failures and degrades (see [`crate::store`]).

use thiserror::Error;

/// The main error type for catalog operations.
///
/// # Examples
///
/// ```
/// use shelfkeeper::CatalogError;
///
/// fn read_storage() -> Result<(), CatalogError> {
///     Err(CatalogError::Storage("Failed to read file".to_string()))
/// }
/// assert!(read_storage().is_err());
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the persistence backend fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote book search could not be completed.
    ///
    /// Covers transport errors, non-success statuses and malformed payloads.
    #[error("Remote search error: {0}")]
    Remote(String),

    /// Communication with the background search worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An intent was rejected because its input is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An entry violates a catalog invariant (e.g. a half-set lending state).
    #[error("Invalid entry {id}: {reason}")]
    InvalidEntry {
        /// Identifier of the offending entry.
        id: String,
        /// Which invariant was broken.
        reason: String,
    },
}

/// A specialized `Result` type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
