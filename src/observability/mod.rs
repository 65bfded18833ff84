//! Structured logging to a rotating file in the data directory.
//!
//! Every module logs through `tracing` macros and spans; this module installs
//! the subscriber that writes them out as JSON lines.
//!
//! ```text
//! tracing macros → EnvFilter → fmt JSON layer → FileWriter → shelfkeeper.log
//! ```
//!
//! # Features
//!
//! - **File-Based Output**: Logs go to `<data_dir>/shelfkeeper.log`, never the terminal
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
