//! SQLite storage implementation

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use super::schema::{self, CONTACT_COLUMNS};
use crate::Result;
use crate::contact::{Contact, ContactUpdate, FieldUpdate, NewContact, UpdateOutcome};

/// Database file used when nothing else is configured
pub const DEFAULT_DATABASE: &str = "app_database.db";

/// SQLite-backed contact storage.
///
/// Holds only the database path; a connection is opened for each call and
/// dropped before the call returns, so nothing stays open between operations.
#[derive(Debug, Clone)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Open a database file (creates it and the schema if missing)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.initialize()?;
        Ok(store)
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Ensure the contacts table exists. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connect()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        tracing::debug!("schema ready in {}", self.path.display());
        Ok(())
    }

    // ========== Contact Operations ==========

    /// Insert a contact stamped with the current UTC time and return its id.
    ///
    /// An empty name is not rejected here; callers validate input.
    pub fn create(&self, contact: &NewContact) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO contacts (name, email, phone, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                contact.name,
                contact.email,
                contact.phone,
                contact.notes,
                utc_timestamp(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "inserted contact");
        Ok(id)
    }

    /// Up to `limit` contacts, most recent first
    pub fn list(&self, limit: usize) -> Result<Vec<Contact>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY id DESC LIMIT ?1"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let contacts = stmt
            .query_map([limit], row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    /// Get a contact by id
    pub fn get(&self, id: i64) -> Result<Option<Contact>> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
            [id],
            row_to_contact,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Case-insensitive substring search over name, email, phone and notes.
    ///
    /// The term is matched literally; an empty term returns every contact.
    pub fn search(&self, term: &str) -> Result<Vec<Contact>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE name LIKE ?1 ESCAPE '\'
               OR email LIKE ?1 ESCAPE '\'
               OR phone LIKE ?1 ESCAPE '\'
               OR notes LIKE ?1 ESCAPE '\'
            ORDER BY id DESC
            "#
        ))?;

        let contacts = stmt
            .query_map([like_pattern(term)], row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    /// Apply the supplied fields to one contact.
    ///
    /// Issues no statement at all when `changes` is empty.
    pub fn update(&self, id: i64, changes: &ContactUpdate) -> Result<UpdateOutcome> {
        let Some(update) = UpdateStatement::build(id, changes) else {
            return Ok(UpdateOutcome::NoChanges);
        };

        let conn = self.connect()?;
        let affected = conn.execute(&update.sql, params_from_iter(update.params.iter()))?;
        tracing::debug!(id, affected, "updated contact");

        Ok(if affected > 0 {
            UpdateOutcome::Updated
        } else {
            UpdateOutcome::NotFound
        })
    }

    /// Delete a contact by id. Returns whether a row was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM contacts WHERE id = ?1", [id])?;
        tracing::debug!(id, affected, "deleted contact");
        Ok(affected > 0)
    }
}

/// Helper to convert a row to a Contact
fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Wrap `term` in `%` wildcards, escaping LIKE metacharacters with `\`
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Column an update is allowed to write
#[derive(Debug, Clone, Copy)]
enum Column {
    Name,
    Email,
    Phone,
    Notes,
}

impl Column {
    fn as_str(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Email => "email",
            Column::Phone => "phone",
            Column::Notes => "notes",
        }
    }
}

/// `UPDATE` statement assembled from fixed column names and numbered
/// placeholders; values only ever travel as bound parameters.
#[derive(Debug)]
struct UpdateStatement {
    sql: String,
    params: Vec<Value>,
}

impl UpdateStatement {
    fn build(id: i64, changes: &ContactUpdate) -> Option<Self> {
        let mut assignments = Vec::new();
        let mut params = Vec::new();

        let mut assign = |column: Column, value: Value| {
            params.push(value);
            assignments.push(format!("{} = ?{}", column.as_str(), params.len()));
        };

        if let Some(name) = &changes.name {
            assign(Column::Name, Value::Text(name.clone()));
        }
        for (column, field) in [
            (Column::Email, &changes.email),
            (Column::Phone, &changes.phone),
            (Column::Notes, &changes.notes),
        ] {
            match field {
                FieldUpdate::Keep => {}
                FieldUpdate::Clear => assign(column, Value::Null),
                FieldUpdate::Set(value) => assign(column, Value::Text(value.clone())),
            }
        }

        if assignments.is_empty() {
            return None;
        }

        params.push(Value::Integer(id));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            schema::CONTACTS_TABLE,
            assignments.join(", "),
            params.len()
        );
        Some(Self { sql, params })
    }
}
