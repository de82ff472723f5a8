use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::contact::Contact;
use crate::ui::table::EMPTY_FIELD;
use crate::ui::{Icons, Theme};

/// Themed line writer used by the shell and the subcommands
pub struct Printer<W> {
    out: W,
    theme: Theme,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write without a newline and flush, for prompts
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text.style(self.theme.prompt))?;
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", Icons::BOOK, text.style(self.theme.title))
    }

    pub fn success(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", Icons::CHECK, label.style(self.theme.success))
    }

    pub fn error(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", Icons::CROSS, label.style(self.theme.failure))
    }

    pub fn warn(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", Icons::WARN, label.style(self.theme.warning))
    }

    pub fn info(&mut self, label: &str, value: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {}: {}",
            Icons::INFO.style(self.theme.label),
            label.style(self.theme.label),
            value
        )
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text.style(self.theme.notice))
    }

    /// One contact as a labelled card followed by a rule
    pub fn contact(&mut self, contact: &Contact) -> io::Result<()> {
        let fields = [
            ("ID", contact.id.to_string()),
            ("Name", contact.name.clone()),
            ("Email", display_optional(&contact.email)),
            ("Phone", display_optional(&contact.phone)),
            ("Notes", display_optional(&contact.notes)),
            ("Created (UTC)", contact.created_at.clone()),
        ];
        for (label, value) in fields {
            writeln!(self.out, "{}: {}", label.style(self.theme.label), value)?;
        }
        writeln!(self.out, "{}", "-".repeat(30).style(self.theme.rule))
    }

    pub fn contacts(&mut self, contacts: &[Contact]) -> io::Result<()> {
        for contact in contacts {
            self.contact(contact)?;
        }
        Ok(())
    }
}

fn display_optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| EMPTY_FIELD.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Printer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut printer = Printer::new(Vec::new(), Theme::plain());
        f(&mut printer).unwrap();
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_contact_card() {
        let contact = Contact {
            id: 7,
            name: "Ana".to_string(),
            email: Some("ana@x.com".to_string()),
            phone: None,
            notes: None,
            created_at: "2024-05-01T10:00:00.000000".to_string(),
        };

        let text = render(|p| p.contact(&contact));

        assert_eq!(
            text,
            "ID: 7\nName: Ana\nEmail: ana@x.com\nPhone: -\nNotes: -\n\
             Created (UTC): 2024-05-01T10:00:00.000000\n------------------------------\n"
        );
    }

    #[test]
    fn test_plain_theme_has_no_escape_codes() {
        let text = render(|p| {
            p.success("done")?;
            p.error("failed")?;
            p.info("Path", "x.csv")
        });

        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("done"));
        assert!(text.contains("Path: x.csv"));
    }
}
