//! Colouring for the notices printed by the family CLI

use owo_colors::{colors::css, OwoColorize};

/// What a line of output is telling the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// An action completed (submitted, exported, saved)
    Done,
    /// Required fields are missing
    Incomplete,
    /// The action waits on another step, such as submitting first
    Blocked,
    /// The input could not be used or an operation failed
    Failed,
    /// A member label or record status
    Member,
    /// Hints, rules and defaults
    Aside,
}

impl Notice {
    /// Renders `text` in this notice's colour, or plain when stdout has no
    /// colour support.
    pub fn paint(self, text: impl AsRef<str>) -> String {
        let text = text.as_ref();
        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            return text.to_string();
        }
        match self {
            Self::Done => text.fg::<css::Green>().to_string(),
            Self::Incomplete => text.fg::<css::Orange>().to_string(),
            Self::Blocked => text.fg::<css::Gold>().to_string(),
            Self::Failed => text.fg::<css::Red>().to_string(),
            Self::Member => text.fg::<css::LightBlue>().to_string(),
            Self::Aside => text.dimmed().to_string(),
        }
    }
}

/// Width of the rule under a report heading, capped at 60 columns
pub fn rule_width() -> usize {
    terminal_size::terminal_size().map_or(60, |(w, _)| usize::from(w.0).min(60))
}
