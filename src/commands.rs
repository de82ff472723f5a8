use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::Context;

use crate::{OptionalField, OutputMode, emit_success};
use contactbook::config::Settings;
use contactbook::ui::{Icons, Printer, Theme, contacts_table};
use contactbook::{
    ChannelInput, Contact, ContactStore, ContactUpdate, FieldUpdate, Input, NewContact, Shell,
    UpdateOutcome, backup_database, export_csv,
};

fn stdout_printer() -> Printer<io::StdoutLock<'static>> {
    Printer::new(io::stdout().lock(), Theme::detect())
}

pub fn run_shell(store: &ContactStore, settings: &Settings) -> anyhow::Result<()> {
    let (input, interrupts) = ChannelInput::spawn(BufReader::new(io::stdin()));
    ctrlc::set_handler(move || {
        let _ = interrupts.send(Input::Interrupted);
    })
    .context("installing the Ctrl-C handler")?;

    let mut shell = Shell::new(store, settings, input, stdout_printer());
    shell.run()?;
    Ok(())
}

pub fn run_add(
    store: &ContactStore,
    output_mode: OutputMode,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let contact = NewContact {
        name,
        email,
        phone,
        notes,
    };
    contact.validate()?;
    let id = store.create(&contact)?;

    if output_mode.is_human() {
        stdout_printer().success(&format!("Contact created with ID {id}."))?;
    } else {
        emit_success("add", serde_json::json!({ "id": id }))?;
    }
    Ok(())
}

fn print_contacts(
    output_mode: OutputMode,
    command: &str,
    contacts: &[Contact],
    empty_message: &str,
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        let mut out = stdout_printer();
        if contacts.is_empty() {
            out.line(empty_message)?;
        } else {
            out.line(&contacts_table(contacts))?;
            out.notice(&format!("{} contact(s)", contacts.len()))?;
        }
    } else {
        emit_success(command, serde_json::to_value(contacts)?)?;
    }
    Ok(())
}

pub fn run_list(store: &ContactStore, output_mode: OutputMode, limit: usize) -> anyhow::Result<()> {
    let contacts = store.list(limit)?;
    print_contacts(output_mode, "list", &contacts, "No contacts found.")
}

pub fn run_search(store: &ContactStore, output_mode: OutputMode, term: &str) -> anyhow::Result<()> {
    let contacts = store.search(term)?;
    if output_mode.is_human() {
        writeln!(io::stdout(), "{} Searching for '{}'...", Icons::SEARCH, term)?;
    }
    print_contacts(output_mode, "search", &contacts, "No results.")
}

pub fn run_show(store: &ContactStore, output_mode: OutputMode, id: i64) -> anyhow::Result<()> {
    let contact = store.get(id)?;

    if output_mode.is_human() {
        let mut out = stdout_printer();
        match contact {
            Some(contact) => out.contact(&contact)?,
            None => out.warn(&format!("Contact {id} not found."))?,
        }
    } else {
        emit_success("show", serde_json::to_value(contact)?)?;
    }
    Ok(())
}

/// Combine `update` flags into a change set. A field may be set or cleared, not both.
pub fn build_update(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
    clear: &[OptionalField],
) -> anyhow::Result<ContactUpdate> {
    let field = |flag: &str, value: Option<String>, column: OptionalField| -> anyhow::Result<FieldUpdate> {
        match (value, clear.contains(&column)) {
            (Some(_), true) => anyhow::bail!("--{flag} and --clear {flag} cannot be combined"),
            (Some(value), false) => Ok(FieldUpdate::Set(value)),
            (None, true) => Ok(FieldUpdate::Clear),
            (None, false) => Ok(FieldUpdate::Keep),
        }
    };

    let changes = ContactUpdate {
        name,
        email: field("email", email, OptionalField::Email)?,
        phone: field("phone", phone, OptionalField::Phone)?,
        notes: field("notes", notes, OptionalField::Notes)?,
    };
    changes.validate()?;
    Ok(changes)
}

pub fn run_update(
    store: &ContactStore,
    output_mode: OutputMode,
    id: i64,
    changes: &ContactUpdate,
) -> anyhow::Result<()> {
    let outcome = store.update(id, changes)?;

    if output_mode.is_human() {
        let mut out = stdout_printer();
        match outcome {
            UpdateOutcome::Updated => out.success(&format!("Contact {id} updated."))?,
            UpdateOutcome::NoChanges => out.line("No changes requested.")?,
            UpdateOutcome::NotFound => out.warn(&format!("Contact {id} not found; nothing updated."))?,
        }
    } else {
        emit_success("update", serde_json::json!({ "id": id, "outcome": outcome }))?;
    }
    Ok(())
}

pub fn run_delete(store: &ContactStore, output_mode: OutputMode, id: i64, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("refusing to delete contact {id} without --yes");
    }
    let deleted = store.delete(id)?;

    if output_mode.is_human() {
        let mut out = stdout_printer();
        if deleted {
            out.success(&format!("Contact {id} deleted."))?;
        } else {
            out.warn(&format!("Contact {id} not found, nothing deleted."))?;
        }
    } else {
        emit_success("delete", serde_json::json!({ "id": id, "deleted": deleted }))?;
    }
    Ok(())
}

pub fn run_export(store: &ContactStore, output_mode: OutputMode, destination: &Path) -> anyhow::Result<()> {
    let path = export_csv(store, destination)?;

    if output_mode.is_human() {
        stdout_printer().info("Exported to", &path.display().to_string())?;
    } else {
        emit_success("export", serde_json::json!({ "path": path.display().to_string() }))?;
    }
    Ok(())
}

pub fn run_backup(
    store: &ContactStore,
    output_mode: OutputMode,
    destination: Option<&Path>,
) -> anyhow::Result<()> {
    let path = backup_database(store.path(), destination)?;

    if output_mode.is_human() {
        stdout_printer().info("Backup created", &path.display().to_string())?;
    } else {
        emit_success("backup", serde_json::json!({ "path": path.display().to_string() }))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_update_rejects_set_and_clear_together() {
        let err = build_update(
            None,
            Some("ana@x.com".to_string()),
            None,
            None,
            &[OptionalField::Email],
        )
        .unwrap_err();

        assert!(err.to_string().contains("--email and --clear email"));
    }

    #[test]
    fn test_build_update_maps_flags_to_field_changes() {
        let changes = build_update(
            None,
            None,
            Some("555".to_string()),
            None,
            &[OptionalField::Notes],
        )
        .unwrap();

        assert!(changes.name.is_none());
        assert_eq!(changes.email, FieldUpdate::Keep);
        assert_eq!(changes.phone, FieldUpdate::Set("555".to_string()));
        assert_eq!(changes.notes, FieldUpdate::Clear);
    }

    #[test]
    fn test_build_update_rejects_blank_name() {
        assert!(build_update(Some("  ".to_string()), None, None, None, &[]).is_err());
    }

    #[test]
    fn test_build_update_without_flags_is_empty() {
        let changes = build_update(None, None, None, None, &[]).unwrap();
        assert!(changes.is_empty());
    }
}
