use tabled::{Table, Tabled, settings::Style};

use crate::contact::Contact;

/// Placeholder shown for absent optional fields
pub const EMPTY_FIELD: &str = "-";

#[derive(Tabled)]
pub struct ContactRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[tabled(rename = "Notes")]
    pub notes: String,
    #[tabled(rename = "Created (UTC)")]
    pub created_at: String,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        let or_empty = |value: &Option<String>| value.clone().unwrap_or_else(|| EMPTY_FIELD.to_string());
        Self {
            id: contact.id,
            name: contact.name.clone(),
            email: or_empty(&contact.email),
            phone: or_empty(&contact.phone),
            notes: or_empty(&contact.notes),
            created_at: contact.created_at.clone(),
        }
    }
}

/// Render contacts as a rounded table; empty input renders nothing
pub fn contacts_table(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return String::new();
    }

    let rows: Vec<ContactRow> = contacts.iter().map(ContactRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_contact() {
        let contacts = vec![
            Contact {
                id: 2,
                name: "Bob".to_string(),
                email: None,
                phone: Some("555".to_string()),
                notes: None,
                created_at: "2024-01-01T00:00:00.000000".to_string(),
            },
            Contact {
                id: 1,
                name: "Ana".to_string(),
                email: Some("ana@x.com".to_string()),
                phone: None,
                notes: None,
                created_at: "2024-01-01T00:00:00.000000".to_string(),
            },
        ];

        let table = contacts_table(&contacts);

        assert!(table.contains("Created (UTC)"));
        assert!(table.contains("Bob"));
        assert!(table.contains("ana@x.com"));
        assert!(contacts_table(&[]).is_empty());
    }
}
