//! Database schema definitions

/// Name of the single table
pub const CONTACTS_TABLE: &str = "contacts";

/// SQL to create the contacts table
pub const CREATE_CONTACTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    notes TEXT,
    created_at TEXT NOT NULL
)
"#;

/// Column list shared by every SELECT, in `Contact` field order
pub const CONTACT_COLUMNS: &str = "id, name, email, phone, notes, created_at";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_CONTACTS_TABLE]
}
