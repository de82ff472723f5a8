//! # Contactbook - single-user contact manager
//!
//! Contactbook provides:
//! - SQLite-backed contact storage with one connection per operation
//! - Case-insensitive substring search across every text field
//! - CSV export and byte-level database backup
//! - An interactive numbered menu plus scriptable subcommands

pub mod config;
pub mod contact;
pub mod export;
pub mod input;
pub mod shell;
pub mod storage;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use config::Settings;
pub use contact::{Contact, ContactUpdate, FieldUpdate, NewContact, UpdateOutcome};
pub use export::{backup_database, export_csv};
pub use input::{ChannelInput, Input, LineSource, ReaderInput};
pub use shell::Shell;
pub use storage::ContactStore;

/// Result type alias for Contactbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Contactbook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database file not found for backup: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
