//! Interactive Shell - numbered menu driving the contact store
//!
//! Single-threaded request/response loop: print the menu, read one line,
//! run the chosen action (which may prompt for more lines), print the
//! outcome, repeat until the exit option or end of input.
//!
//! Ctrl-C or end of input at an action prompt cancels that prompt. Prompts
//! with a harmless default (list limit, delete confirmation) fall back to it;
//! every other prompt abandons the current action. Ctrl-C at the menu only
//! redraws it; end of input there ends the session.

use std::io::{self, Write};

use crate::config::Settings;
use crate::contact::{ContactUpdate, FieldUpdate, NewContact, UpdateOutcome};
use crate::export::{backup_database, export_csv};
use crate::input::{Input, LineSource};
use crate::storage::ContactStore;
use crate::ui::Printer;
use crate::Result;

const MENU_TITLE: &str = "==== Contact Book (SQLite) ====";
const MENU_ITEMS: &[&str] = &[
    "1) Create contact",
    "2) List contacts",
    "3) Show contact by ID",
    "4) Search contacts (name, email, phone, notes)",
    "5) Update contact",
    "6) Delete contact",
    "7) Export to CSV",
    "8) Back up database",
    "9) Exit",
];
const MENU_RULE: &str = "===============================";

/// Answer that clears an optional field during an update
const CLEAR_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Create,
    List,
    Show,
    Search,
    Update,
    Delete,
    Export,
    Backup,
    Exit,
}

impl MenuOption {
    fn parse(choice: &str) -> Option<Self> {
        let option = match choice {
            "1" => Self::Create,
            "2" => Self::List,
            "3" => Self::Show,
            "4" => Self::Search,
            "5" => Self::Update,
            "6" => Self::Delete,
            "7" => Self::Export,
            "8" => Self::Backup,
            "9" => Self::Exit,
            _ => return None,
        };
        Some(option)
    }
}

/// Confirmation answers accepted before deleting
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "sim")
}

fn field_update(answer: &str) -> FieldUpdate {
    match answer {
        "" => FieldUpdate::Keep,
        CLEAR_MARKER => FieldUpdate::Clear,
        value => FieldUpdate::Set(value.to_string()),
    }
}

pub struct Shell<'a, I, W> {
    store: &'a ContactStore,
    settings: &'a Settings,
    input: I,
    out: Printer<W>,
}

impl<'a, I: LineSource, W: Write> Shell<'a, I, W> {
    pub fn new(store: &'a ContactStore, settings: &'a Settings, input: I, out: Printer<W>) -> Self {
        Self {
            store,
            settings,
            input,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out.into_inner()
    }

    /// Run the menu loop until the exit option or end of input.
    ///
    /// Action failures are printed and the loop continues; only a failure
    /// writing to the output ends the session with an error.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            self.out.prompt("Choose an option (1-9): ")?;
            let choice = match self.input.next_line() {
                Input::Line(choice) => choice,
                Input::Interrupted => {
                    self.cancelled()?;
                    continue;
                }
                Input::Eof => {
                    self.out.blank()?;
                    return self.out.line("Goodbye!");
                }
            };
            if choice.is_empty() {
                continue;
            }

            let Some(option) = MenuOption::parse(&choice) else {
                self.out.warn("Invalid option. Try again.")?;
                continue;
            };
            if option == MenuOption::Exit {
                return self.out.line("Exiting... Goodbye!");
            }

            if let Err(err) = self.dispatch(option) {
                tracing::debug!(?option, "action failed: {err}");
                self.out.error(&err.to_string())?;
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.out.blank()?;
        self.out.title(MENU_TITLE)?;
        for item in MENU_ITEMS {
            self.out.line(item)?;
        }
        self.out.line(MENU_RULE)
    }

    fn dispatch(&mut self, option: MenuOption) -> Result<()> {
        match option {
            MenuOption::Create => self.create(),
            MenuOption::List => self.list(),
            MenuOption::Show => self.show(),
            MenuOption::Search => self.search(),
            MenuOption::Update => self.update(),
            MenuOption::Delete => self.delete(),
            MenuOption::Export => self.export(),
            MenuOption::Backup => self.backup(),
            MenuOption::Exit => Ok(()),
        }
    }

    // ========== Input ==========

    fn cancelled(&mut self) -> io::Result<()> {
        self.out.blank()?;
        self.out.notice("Operation cancelled.")
    }

    /// Prompt and read one answer; `None` means the user interrupted
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.out.prompt(prompt)?;
        match self.input.next_line() {
            Input::Line(answer) => Ok(Some(answer)),
            Input::Interrupted | Input::Eof => {
                self.cancelled()?;
                Ok(None)
            }
        }
    }

    /// Prompt for an id; `None` after a cancel or an unparseable answer
    fn ask_id(&mut self, prompt: &str) -> io::Result<Option<i64>> {
        let Some(answer) = self.ask(prompt)? else {
            return Ok(None);
        };
        match answer.parse::<i64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.out.warn("Invalid ID.")?;
                Ok(None)
            }
        }
    }

    // ========== Actions ==========

    fn create(&mut self) -> Result<()> {
        let Some(name) = self.ask("Name: ")? else {
            return Ok(());
        };
        let mut contact = NewContact::new(name);
        if contact.validate().is_err() {
            self.out.warn("Name is required.")?;
            return Ok(());
        }

        for (prompt, slot) in [
            ("Email (enter to skip): ", &mut contact.email),
            ("Phone (enter to skip): ", &mut contact.phone),
            ("Notes (enter to skip): ", &mut contact.notes),
        ] {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(());
            };
            *slot = Some(answer).filter(|value| !value.is_empty());
        }

        let id = self.store.create(&contact)?;
        self.out.success(&format!("Contact created with ID {id}."))?;
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        let default_limit = self.settings.list_limit;
        let limit = self
            .ask(&format!("How many to list? (enter for {default_limit}): "))?
            .and_then(|answer| answer.parse::<usize>().ok())
            .unwrap_or(default_limit);

        let contacts = self.store.list(limit)?;
        if contacts.is_empty() {
            self.out.line("No contacts found.")?;
        } else {
            self.out.contacts(&contacts)?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("Contact ID: ")? else {
            return Ok(());
        };
        match self.store.get(id)? {
            Some(contact) => self.out.contact(&contact)?,
            None => self.out.warn("Contact not found.")?,
        }
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let Some(term) = self.ask("Search term: ")? else {
            return Ok(());
        };
        if term.is_empty() {
            self.out.warn("Empty search term.")?;
            return Ok(());
        }

        let results = self.store.search(&term)?;
        if results.is_empty() {
            self.out.line("No results.")?;
        } else {
            self.out.contacts(&results)?;
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("ID of the contact to update: ")? else {
            return Ok(());
        };
        let Some(existing) = self.store.get(id)? else {
            self.out.warn("Contact does not exist.")?;
            return Ok(());
        };

        self.out.notice("Leave blank to keep the current value, or enter '-' to clear an optional field.")?;

        let Some(name) = self.ask(&format!("Name ({}): ", existing.name))? else {
            return Ok(());
        };
        let mut changes = ContactUpdate::default();
        if name == CLEAR_MARKER {
            self.out.warn("The name cannot be cleared; keeping it.")?;
        } else if !name.is_empty() {
            changes.name = Some(name);
        }

        for (label, current, slot) in [
            ("Email", existing.email.as_deref(), &mut changes.email),
            ("Phone", existing.phone.as_deref(), &mut changes.phone),
            ("Notes", existing.notes.as_deref(), &mut changes.notes),
        ] {
            let prompt = format!("{label} ({}): ", current.unwrap_or(CLEAR_MARKER));
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(());
            };
            *slot = field_update(&answer);
        }

        match self.store.update(id, &changes)? {
            UpdateOutcome::Updated => self.out.success("Contact updated.")?,
            UpdateOutcome::NoChanges => self.out.line("No changes applied.")?,
            UpdateOutcome::NotFound => self.out.warn("Contact no longer exists; nothing updated.")?,
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("ID of the contact to delete: ")? else {
            return Ok(());
        };
        let confirm = self
            .ask(&format!("Confirm deletion of contact {id}? (y/N): "))?
            .unwrap_or_default();

        if !is_affirmative(&confirm) {
            self.out.line("Deletion cancelled.")?;
            return Ok(());
        }

        if self.store.delete(id)? {
            self.out.success("Contact deleted.")?;
        } else {
            self.out.warn("ID not found, nothing deleted.")?;
        }
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        let default_file = self.settings.export_file.clone();
        let prompt = format!("CSV file name (enter for {}): ", default_file.display());
        let Some(answer) = self.ask(&prompt)? else {
            return Ok(());
        };
        let destination = if answer.is_empty() {
            default_file
        } else {
            answer.into()
        };

        let path = export_csv(self.store, &destination)?;
        self.out.success(&format!("Exported to {}.", path.display()))?;
        Ok(())
    }

    fn backup(&mut self) -> Result<()> {
        let Some(answer) = self.ask("Backup file name (enter for automatic): ")? else {
            return Ok(());
        };
        let destination = Some(answer).filter(|name| !name.is_empty()).map(std::path::PathBuf::from);

        let path = backup_database(self.store.path(), destination.as_deref())?;
        self.out.success(&format!("Backup created: {}", path.display()))?;
        Ok(())
    }
}
