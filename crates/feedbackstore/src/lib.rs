//! `feedbackstore` - A durable store for short multilingual feedback messages
//!
//! This library provides a `SQLite`-backed message store with list, get,
//! create, and delete operations, plus the boundary API and configuration
//! used by the `fbstore` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod storage;

pub use api::Response;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use logging::init_logging;
pub use message::{Message, MessagePayload};
pub use storage::{MessageStore, StorageStats, StoreLimits};
