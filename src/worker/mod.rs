//! Background worker thread for remote searches.
//!
//! Remote search is the only blocking I/O the store triggers from user intents,
//! so it runs on its own thread and reports back over a channel.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types
//! - `handler`: Worker implementation, message processing and the thread handle

pub mod handler;
pub mod messages;

pub use handler::{SearchWorker, WorkerHandle};
pub use messages::{WorkerMessage, WorkerResponse};
