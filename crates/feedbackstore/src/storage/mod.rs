//! Storage layer for feedbackstore.
//!
//! This module provides the `SQLite`-backed message store: an ordered,
//! unique-keyed collection of [`Message`] records that survives restarts.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::message::{from_nanos, Message, MessagePayload};

use schema::MESSAGE_COLUMNS;

/// Default maximum key size in bytes.
pub const DEFAULT_MAX_KEY_BYTES: usize = 44;

/// Default maximum encoded record size in bytes.
pub const DEFAULT_MAX_VALUE_BYTES: usize = 1024;

/// Size budget for a single entry. A limit of 0 means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Maximum id length in bytes.
    pub max_key_bytes: usize,
    /// Maximum JSON-encoded record length in bytes.
    pub max_value_bytes: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_key_bytes: DEFAULT_MAX_KEY_BYTES,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        }
    }
}

impl StoreLimits {
    /// No size limits at all.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_key_bytes: 0,
            max_value_bytes: 0,
        }
    }

    fn check(what: &'static str, size: usize, limit: usize) -> Result<()> {
        if limit != 0 && size > limit {
            return Err(Error::ValueTooLarge { what, size, limit });
        }
        Ok(())
    }
}

impl From<&StorageConfig> for StoreLimits {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_key_bytes: config.max_key_bytes,
            max_value_bytes: config.max_value_bytes,
        }
    }
}

/// Durable store of feedback messages keyed by id.
///
/// Every operation touches at most one row, so no multi-statement
/// transactions are needed.
#[derive(Debug)]
pub struct MessageStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Per-entry size budget.
    limits: StoreLimits,
}

impl MessageStore {
    /// Open or create a store at the given path with default limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_limits(path, StoreLimits::default())
    }

    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open_with_limits(path: impl AsRef<Path>, limits: StoreLimits) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn, limits })
    }

    /// Create an in-memory store with default limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_limits(StoreLimits::default())
    }

    /// Create an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory_with_limits(limits: StoreLimits) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            limits,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the size budget this store enforces.
    #[must_use]
    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    /// List every stored message in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<Message>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY id"))?;

        let messages = stmt
            .query_map([], Self::row_to_message)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Listed {} messages", messages.len());
        Ok(messages)
    }

    /// Get a message by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a blank id, [`Error::NotFound`]
    /// if no such message exists, or a storage error.
    pub fn get(&self, id: &str) -> Result<Message> {
        validate_id(id)?;

        self.conn
            .query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
                [id],
                Self::row_to_message,
            )
            .optional()?
            .ok_or_else(|| Error::not_found(id))
    }

    /// Create a message from a payload and store it.
    ///
    /// Returns the stored record, including its generated id and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any payload field is empty,
    /// [`Error::ValueTooLarge`] if the record exceeds the size budget, or a
    /// storage error.
    pub fn create(&self, payload: MessagePayload) -> Result<Message> {
        payload.validate()?;

        let message = Message::new(payload);
        self.insert(&message)?;

        debug!("Created message with id {}", message.id);
        Ok(message)
    }

    /// Delete a message by id, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a blank id, [`Error::NotFound`]
    /// if no such message exists, or a storage error.
    pub fn delete(&self, id: &str) -> Result<Message> {
        validate_id(id)?;

        let removed = self
            .conn
            .query_row(
                &format!("DELETE FROM messages WHERE id = ?1 RETURNING {MESSAGE_COLUMNS}"),
                [id],
                Self::row_to_message,
            )
            .optional()?
            .ok_or_else(|| Error::not_found(id))?;

        debug!("Deleted message with id {}", removed.id);
        Ok(removed)
    }

    /// Count stored messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let (total_messages, oldest, newest): (i64, Option<i64>, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), MIN(created_at), MAX(created_at) FROM messages",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_messages,
            oldest_message: oldest.and_then(|n| u64::try_from(n).ok()).map(from_nanos),
            newest_message: newest.and_then(|n| u64::try_from(n).ok()).map(from_nanos),
            db_size_bytes,
        })
    }

    /// Insert a fully formed message, enforcing the size budget.
    fn insert(&self, message: &Message) -> Result<()> {
        StoreLimits::check("key", message.id.len(), self.limits.max_key_bytes)?;
        if self.limits.max_value_bytes != 0 {
            let encoded = serde_json::to_vec(message)?;
            StoreLimits::check("value", encoded.len(), self.limits.max_value_bytes)?;
        }

        let created_at = timestamp_to_sql(message.created_at)?;
        let updated_at = message.updated_at.map(timestamp_to_sql).transpose()?;

        self.conn.execute(
            r"
            INSERT INTO messages
                (id, email, language1, language2, comment, attachment_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
            params![
                message.id,
                message.email,
                message.language1,
                message.language2,
                message.comment,
                message.attachment_url,
                created_at,
                updated_at,
            ],
        )?;
        Ok(())
    }

    /// Convert a database row to a Message struct.
    fn row_to_message(row: &rusqlite::Row) -> rusqlite::Result<Message> {
        Ok(Message {
            id: row.get(0)?,
            email: row.get(1)?,
            language1: row.get(2)?,
            language2: row.get(3)?,
            comment: row.get(4)?,
            attachment_url: row.get(5)?,
            created_at: timestamp_from_sql(row.get(6)?, 6)?,
            updated_at: row
                .get::<_, Option<i64>>(7)?
                .map(|n| timestamp_from_sql(n, 7))
                .transpose()?,
        })
    }
}

// Timestamps are u64 nanoseconds in memory and signed INTEGER columns on disk.
fn timestamp_to_sql(nanos: u64) -> Result<i64> {
    i64::try_from(nanos)
        .map_err(|e| Error::DatabaseQuery(rusqlite::Error::ToSqlConversionFailure(Box::new(e))))
}

fn timestamp_from_sql(value: i64, column: usize) -> rusqlite::Result<u64> {
    u64::try_from(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e))
    })
}

/// Reject ids that are empty once surrounding whitespace is removed.
fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_argument(
            "Invalid ID. ID must be a non-empty string.",
        ));
    }
    Ok(())
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of messages stored.
    pub total_messages: i64,
    /// Creation time of the oldest message.
    pub oldest_message: Option<DateTime<Utc>>,
    /// Creation time of the newest message.
    pub newest_message: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> MessageStore {
        MessageStore::open_in_memory().expect("failed to create test store")
    }

    fn sample_payload() -> MessagePayload {
        MessagePayload {
            email: "a@b.com".to_string(),
            language1: "en".to_string(),
            language2: "fr".to_string(),
            comment: "hi".to_string(),
            attachment_url: "http://x/y".to_string(),
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = MessageStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_create_and_get() {
        let store = create_test_store();
        let created = store.create(sample_payload()).unwrap();

        assert!(!created.id.is_empty());
        assert!(created.created_at > 0);
        assert!(created.updated_at.is_none());

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.payload(), sample_payload());
    }

    #[test]
    fn test_create_rejects_empty_comment() {
        let store = create_test_store();
        let mut payload = sample_payload();
        payload.comment = String::new();

        let err = store.create(payload).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_get_blank_id() {
        let store = create_test_store();
        for id in ["", "   ", "\t\n"] {
            let err = store.get(id).unwrap_err();
            assert!(err.is_invalid_argument(), "id {id:?} should be invalid");
        }
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        let err = store.get("missing").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("id=missing"));
    }

    #[test]
    fn test_get_does_not_trim_lookup_key() {
        let store = create_test_store();
        let created = store.create(sample_payload()).unwrap();

        let padded = format!(" {} ", created.id);
        assert!(store.get(&padded).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_returns_removed_record() {
        let store = create_test_store();
        let created = store.create(sample_payload()).unwrap();
        let before = store.get(&created.id).unwrap();

        let removed = store.delete(&created.id).unwrap();
        assert_eq!(removed, before);
        assert!(store.get(&created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_twice() {
        let store = create_test_store();
        let created = store.create(sample_payload()).unwrap();

        assert!(store.delete(&created.id).is_ok());
        assert!(store.delete(&created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_blank_id() {
        let store = create_test_store();
        store.create(sample_payload()).unwrap();

        assert!(store.delete(" ").unwrap_err().is_invalid_argument());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_in_key_order() {
        let store = create_test_store();
        for _ in 0..5 {
            store.create(sample_payload()).unwrap();
        }

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 5);

        let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_list_empty() {
        let store = create_test_store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_after_creates_and_deletes() {
        let store = create_test_store();
        let created: Vec<Message> = (0..6)
            .map(|_| store.create(sample_payload()).unwrap())
            .collect();

        store.delete(&created[1].id).unwrap();
        store.delete(&created[4].id).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 4);
        for message in &listed {
            assert!(created.contains(message));
            assert_ne!(message.id, created[1].id);
            assert_ne!(message.id, created[4].id);
        }
    }

    #[test]
    fn test_value_budget_enforced() {
        let store = create_test_store();
        let mut payload = sample_payload();
        payload.comment = "x".repeat(DEFAULT_MAX_VALUE_BYTES);

        let err = store.create(payload).unwrap_err();
        assert!(matches!(err, Error::ValueTooLarge { what: "value", .. }));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_key_budget_enforced() {
        let store = MessageStore::open_in_memory_with_limits(StoreLimits {
            max_key_bytes: 8,
            max_value_bytes: 0,
        })
        .unwrap();

        let err = store.create(sample_payload()).unwrap_err();
        assert!(matches!(err, Error::ValueTooLarge { what: "key", .. }));
    }

    #[test]
    fn test_unlimited_store_accepts_large_values() {
        let store = MessageStore::open_in_memory_with_limits(StoreLimits::unlimited()).unwrap();
        let mut payload = sample_payload();
        payload.comment = "x".repeat(100_000);

        let created = store.create(payload).unwrap();
        assert_eq!(store.get(&created.id).unwrap().comment.len(), 100_000);
    }

    #[test]
    fn test_unicode_content() {
        let store = create_test_store();
        let mut payload = sample_payload();
        payload.comment = "Hello 世界 🌍 مرحبا".to_string();

        let created = store.create(payload).unwrap();
        assert_eq!(store.get(&created.id).unwrap().comment, "Hello 世界 🌍 مرحبا");
    }

    #[test]
    fn test_duplicate_id_is_storage_fault() {
        let store = create_test_store();
        let message = Message::with_id("fixed".to_string(), sample_payload(), 1);

        store.insert(&message).unwrap();
        let err = store.insert(&message).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::StorageFault);
    }

    #[test]
    fn test_timestamps_round_trip() {
        let store = create_test_store();
        let max = u64::try_from(i64::MAX).unwrap();
        let mut message = Message::with_id("late".to_string(), sample_payload(), max);
        message.updated_at = Some(max - 1);

        store.insert(&message).unwrap();
        let fetched = store.get("late").unwrap();
        assert_eq!(fetched.created_at, max);
        assert_eq!(fetched.updated_at, Some(max - 1));
    }

    #[test]
    fn test_timestamp_overflow_is_storage_fault() {
        let store = create_test_store();
        let message = Message::with_id("future".to_string(), sample_payload(), u64::MAX);

        let err = store.insert(&message).unwrap_err();
        assert!(matches!(err, Error::DatabaseQuery(_)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_negative_stored_timestamp_is_storage_fault() {
        let store = create_test_store();
        store
            .conn
            .execute(
                r"
                INSERT INTO messages
                    (id, email, language1, language2, comment, attachment_url, created_at)
                VALUES ('neg', 'e', 'en', 'fr', 'c', 'u', -5)
                ",
                [],
            )
            .unwrap();

        let err = store.get("neg").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::StorageFault);
        assert!(store.list().is_err());
    }

    #[test]
    fn test_stats_empty() {
        let store = create_test_store();
        let stats = store.stats().unwrap();

        assert_eq!(stats.total_messages, 0);
        assert!(stats.oldest_message.is_none());
        assert!(stats.newest_message.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let store = create_test_store();
        store
            .insert(&Message::with_id("a".to_string(), sample_payload(), 1_000_000_000))
            .unwrap();
        store
            .insert(&Message::with_id("b".to_string(), sample_payload(), 5_000_000_000))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.oldest_message.unwrap().timestamp(), 1);
        assert_eq!(stats.newest_message.unwrap().timestamp(), 5);
    }

    #[test]
    fn test_path() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
        assert_eq!(store.limits(), StoreLimits::default());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/messages.db");

        let store = MessageStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        assert_eq!(store.path(), nested_path);
    }

    #[test]
    fn test_limits_from_config() {
        let config = StorageConfig {
            database_path: None,
            max_key_bytes: 64,
            max_value_bytes: 0,
        };
        let limits = StoreLimits::from(&config);
        assert_eq!(limits.max_key_bytes, 64);
        assert_eq!(limits.max_value_bytes, 0);
    }
}
