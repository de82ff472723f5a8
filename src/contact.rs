//! Contact record and the inputs used to create or change one

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted contact row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    /// UTC creation time, set once on insert
    pub created_at: String,
}

/// Fields supplied when creating a contact (id and timestamp come from storage)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewContact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Reject a blank name. Storage does not check this itself.
    pub fn validate(&self) -> Result<()> {
        require_name(&self.name)
    }
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("name is required".to_string()));
    }
    Ok(())
}

/// Change requested for one optional column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Leave the stored value untouched
    #[default]
    Keep,
    /// Store NULL
    Clear,
    /// Store this value, empty strings included
    Set(String),
}

impl FieldUpdate {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }
}

/// Partial update of a contact. Only non-`Keep` fields reach the statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    /// The name is required, so it can be replaced but never cleared
    pub name: Option<String>,
    pub email: FieldUpdate,
    pub phone: FieldUpdate,
    pub notes: FieldUpdate,
}

impl ContactUpdate {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_keep() && self.phone.is_keep() && self.notes.is_keep()
    }

    /// A replacement name, when given, must not be blank
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => require_name(name),
            None => Ok(()),
        }
    }
}

/// Result of [`crate::ContactStore::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Nothing was supplied; no statement was issued
    NoChanges,
    Updated,
    /// No row has the given id
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_update_is_empty() {
        assert!(ContactUpdate::default().is_empty());

        let update = ContactUpdate {
            notes: FieldUpdate::Clear,
            ..ContactUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_blank_names_rejected() {
        assert!(NewContact::new("  ").validate().is_err());
        assert!(NewContact::new("Ana").validate().is_ok());

        let rename = ContactUpdate {
            name: Some(String::new()),
            ..ContactUpdate::default()
        };
        assert!(matches!(rename.validate(), Err(Error::InvalidInput(_))));
        assert!(ContactUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_new_contact_builder() {
        let contact = NewContact::new("Ana").email("ana@x.com");
        assert_eq!(contact.name, "Ana");
        assert_eq!(contact.email.as_deref(), Some("ana@x.com"));
        assert!(contact.phone.is_none());
        assert!(contact.notes.is_none());
    }
}
