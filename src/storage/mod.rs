//! Storage Layer - SQLite-backed persistence
//!
//! One table, `contacts(id, name, email, phone, notes, created_at)`.
//! Every operation opens its own connection, runs one statement and
//! releases the connection before returning.

pub mod schema;
pub mod sqlite;

pub use sqlite::{ContactStore, DEFAULT_DATABASE};
