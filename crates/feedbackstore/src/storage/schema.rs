//! `SQLite` schema definitions for feedbackstore.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the messages table.
///
/// `id` is the primary key, so `ORDER BY id` walks the table in key order.
pub const CREATE_MESSAGES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL,
    language1 TEXT NOT NULL,
    language2 TEXT NOT NULL,
    comment TEXT NOT NULL,
    attachment_url TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER
)
";

/// SQL statement to create an index on `created_at` for stats queries.
pub const CREATE_CREATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_MESSAGES_TABLE,
    CREATE_CREATED_AT_INDEX,
    CREATE_METADATA_TABLE,
];

/// Column list shared by every query that reads a full message row.
pub const MESSAGE_COLUMNS: &str =
    "id, email, language1, language2, comment, attachment_url, created_at, updated_at";
