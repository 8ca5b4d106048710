//! Core record types for feedbackstore.
//!
//! A [`Message`] is a single feedback entry; a [`MessagePayload`] is the part
//! of it a client supplies when creating one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// The caller-supplied fields of a new message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    /// Contact address of the submitter.
    pub email: String,
    /// First language tag.
    pub language1: String,
    /// Second language tag.
    pub language2: String,
    /// Free-text feedback.
    pub comment: String,
    /// Link to an attached file.
    #[serde(rename = "attachmentURL")]
    pub attachment_url: String,
}

impl MessagePayload {
    /// Check that every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("email", &self.email),
            ("language1", &self.language1),
            ("language2", &self.language2),
            ("comment", &self.comment),
            ("attachmentURL", &self.attachment_url),
        ];

        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(Error::invalid_argument(format!(
                "Invalid payload. All fields must be provided; `{name}` is empty."
            ))),
            None => Ok(()),
        }
    }
}

/// A stored feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier, assigned on creation.
    pub id: String,
    /// Contact address of the submitter.
    pub email: String,
    /// First language tag.
    pub language1: String,
    /// Second language tag.
    pub language2: String,
    /// Free-text feedback.
    pub comment: String,
    /// Link to an attached file.
    #[serde(rename = "attachmentURL")]
    pub attachment_url: String,
    /// Creation time in nanoseconds since the Unix epoch.
    pub created_at: u64,
    /// Last modification time. Nothing sets this yet.
    pub updated_at: Option<u64>,
}

impl Message {
    /// Build a new message from a payload with a fresh id and the current time.
    ///
    /// The payload is not validated here; see [`MessagePayload::validate`].
    #[must_use]
    pub fn new(payload: MessagePayload) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), payload, now_nanos())
    }

    /// Build a message with an explicit id and creation time.
    #[must_use]
    pub fn with_id(id: String, payload: MessagePayload, created_at: u64) -> Self {
        Self {
            id,
            email: payload.email,
            language1: payload.language1,
            language2: payload.language2,
            comment: payload.comment,
            attachment_url: payload.attachment_url,
            created_at,
            updated_at: None,
        }
    }

    /// The caller-supplied part of this message.
    #[must_use]
    pub fn payload(&self) -> MessagePayload {
        MessagePayload {
            email: self.email.clone(),
            language1: self.language1.clone(),
            language2: self.language2.clone(),
            comment: self.comment.clone(),
            attachment_url: self.attachment_url.clone(),
        }
    }

    /// Creation time as a UTC datetime.
    #[must_use]
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        from_nanos(self.created_at)
    }
}

/// Current time in nanoseconds since the Unix epoch.
#[must_use]
pub fn now_nanos() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or_default()
}

/// Convert a nanosecond timestamp to a UTC datetime.
#[must_use]
pub fn from_nanos(nanos: u64) -> DateTime<Utc> {
    // u64 nanos always fit once reduced to seconds
    let secs = i64::try_from(nanos / 1_000_000_000).unwrap_or(i64::MAX);
    let subsec = u32::try_from(nanos % 1_000_000_000).unwrap_or_default();
    DateTime::from_timestamp(secs, subsec).unwrap_or_default()
}
