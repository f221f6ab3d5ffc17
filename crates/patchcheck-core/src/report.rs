//! Leveled diagnostic messages accumulated during validation.

use std::fmt;

use serde::Serialize;

/// Severity of a single diagnostic line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The patch cannot apply as written.
    Error,
    /// Suspicious but not fatal (context drift).
    Warning,
    /// Status worth knowing (change not yet applied, skipped patch).
    Info,
    /// A line matched where the patch expects it.
    Ok,
    /// A mismatched line was located elsewhere in the file.
    Find,
    /// Unleveled framing text (patch and diff banners, summary).
    Misc,
}

impl Level {
    /// The fixed-width column prefix used in rendered output.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Error => "ERROR: ",
            Self::Warning => "WARN:  ",
            Self::Info => "INFO:  ",
            Self::Ok => "-OK-:  ",
            Self::Find => "FIND:  ",
            Self::Misc => "",
        }
    }
}

/// One diagnostic line with its nesting depth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Severity of this message.
    pub level: Level,
    /// Nesting depth (patch = 0, diff = 1, hunk = 2, edit = 3).
    pub indent: usize,
    /// The message text.
    pub text: String,
}

impl Message {
    pub(crate) fn new(level: Level, indent: usize, text: impl Into<String>) -> Self {
        Self { level, indent, text: text.into() }
    }

    /// Renders the message with its prefix and indentation.
    #[must_use]
    pub fn render(&self, indent_unit: &str) -> String {
        format!("{}{}{}", indent_unit.repeat(self.indent), self.level.prefix(), self.text)
    }
}

/// Renders with the default three-space indent unit. Callers honoring a
/// configured indent unit use [`Message::render`] instead.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("   "))
    }
}

/// The outcome of validating a batch of patches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Ordered diagnostics across all checked patches.
    pub messages: Vec<Message>,
    /// Patches with no errors.
    pub passed: usize,
    /// Empty or binary patches.
    pub skipped: usize,
    /// Patches with at least one error.
    pub failed: usize,
}

impl Report {
    pub(crate) fn push(&mut self, level: Level, indent: usize, text: impl Into<String>) {
        self.messages.push(Message::new(level, indent, text));
    }

    /// True when any checked patch failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Renders every message with the given indent unit.
    pub fn lines<'a>(&'a self, indent_unit: &'a str) -> impl Iterator<Item = String> + 'a {
        self.messages.iter().map(move |message| message.render(indent_unit))
    }
}
