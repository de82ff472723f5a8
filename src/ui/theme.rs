use owo_colors::Style;

/// Styles for each kind of line the [`Printer`](crate::ui::Printer) writes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Menu title
    pub title: Style,
    /// Text waiting for an answer
    pub prompt: Style,
    /// Field names on contact cards and info lines
    pub label: Style,
    /// Separator under each contact card
    pub rule: Style,
    /// Hints and cancellations
    pub notice: Style,
    pub success: Style,
    pub warning: Style,
    pub failure: Style,
}

impl Theme {
    /// Pick the palette for stdout.
    pub fn detect() -> Self {
        Self::for_terminal(console::Term::stdout().is_term())
    }

    /// Escape codes only reach a terminal; piped output stays plain.
    pub fn for_terminal(is_term: bool) -> Self {
        if is_term { Self::colored() } else { Self::plain() }
    }

    pub fn colored() -> Self {
        Self {
            title: Style::new().bright_blue().bold().underline(),
            prompt: Style::new().bold(),
            label: Style::new().cyan(),
            rule: Style::new().bright_black(),
            notice: Style::new().italic(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            failure: Style::new().bright_red().bold(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            title: none,
            prompt: none,
            label: none,
            rule: none,
            notice: none,
            success: none,
            warning: none,
            failure: none,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_piped_output_is_plain() {
        let theme = Theme::for_terminal(false);
        assert_eq!(theme, Theme::plain());
        assert_eq!("Name".style(theme.label).to_string(), "Name");
    }

    #[test]
    fn test_terminal_output_is_colored() {
        let theme = Theme::for_terminal(true);
        assert_eq!(theme, Theme::colored());
        assert!("Name".style(theme.label).to_string().starts_with('\u{1b}'));
    }
}
