//! Boundary entry points for feedbackstore.
//!
//! Each function wraps one [`MessageStore`] operation and converts every
//! failure into a [`Response::Err`] carrying a human-readable message, so
//! callers only ever see a success value or a string.
//!
//! ```
//! use feedbackstore::api::{self, Response};
//! use feedbackstore::{MessagePayload, MessageStore};
//!
//! let store = MessageStore::open_in_memory().unwrap();
//! let payload = MessagePayload {
//!     email: "a@b.com".into(),
//!     language1: "en".into(),
//!     language2: "fr".into(),
//!     comment: "hi".into(),
//!     attachment_url: "http://x/y".into(),
//! };
//!
//! let Response::Ok(created) = api::add_message(&store, payload) else {
//!     panic!("create failed");
//! };
//! assert!(api::get_message(&store, &created.id).is_ok());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::message::{Message, MessagePayload};
use crate::storage::MessageStore;

/// Outcome of a boundary call.
///
/// Serializes as `{"Ok": value}` or `{"Err": "message"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub enum Response<T> {
    /// The operation succeeded.
    Ok(T),
    /// The operation failed; the string describes why.
    Err(String),
}

impl<T> Response<T> {
    /// Whether this is a success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Whether this is a failure.
    #[must_use]
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Convert into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the error message if this is a failure.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(message) => Err(message),
        }
    }

    fn from_result(result: Result<T>, context: &str) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Err(describe(&err, context)),
        }
    }
}

/// Render an error for the caller, logging it on the way out.
fn describe(err: &Error, context: &str) -> String {
    match err.kind() {
        ErrorKind::StorageFault | ErrorKind::Config => error!("{context}: {err}"),
        ErrorKind::InvalidArgument | ErrorKind::NotFound => warn!("{context}: {err}"),
    }

    if err.is_not_found() {
        err.to_string()
    } else {
        format!("{context}: {err}")
    }
}

/// Retrieve all messages.
pub fn get_messages(store: &MessageStore) -> Response<Vec<Message>> {
    Response::from_result(store.list(), "Error retrieving message")
}

/// Retrieve a single message by id.
pub fn get_message(store: &MessageStore, id: &str) -> Response<Message> {
    Response::from_result(store.get(id), "Error retrieving message")
}

/// Create a new message from a payload.
pub fn add_message(store: &MessageStore, payload: MessagePayload) -> Response<Message> {
    Response::from_result(store.create(payload), "Error adding message")
}

/// Delete a message by id, returning what was removed.
pub fn delete_message(store: &MessageStore, id: &str) -> Response<Message> {
    Response::from_result(store.delete(id), "Error deleting message")
}
