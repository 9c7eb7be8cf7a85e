//! Styled output units produced by command handlers.

use crate::sanitize_terminal_text;

/// Display tag attached to every output line.
///
/// The presentation layer maps each tag to concrete colors; the engine only
/// decides which tag applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputStyle {
    #[default]
    Plain,
    Bold,
    Command,
    Path,
    Error,
    Success,
}

impl OutputStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Bold => "bold",
            Self::Command => "command",
            Self::Path => "path",
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

/// One styled unit of text destined for the display surface.
///
/// `text` may span several lines; the renderer splits on `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    text: String,
    style: OutputStyle,
}

impl OutputEvent {
    #[must_use]
    pub fn new(text: impl Into<String>, style: OutputStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Build an event from text produced outside the process (child output,
    /// file contents, network errors). Terminal control sequences are stripped.
    #[must_use]
    pub fn untrusted(text: &str, style: OutputStyle) -> Self {
        Self::new(sanitize_terminal_text(text).into_owned(), style)
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, OutputStyle::Plain)
    }

    #[must_use]
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, OutputStyle::Bold)
    }

    #[must_use]
    pub fn command(text: impl Into<String>) -> Self {
        Self::new(text, OutputStyle::Command)
    }

    #[must_use]
    pub fn path(text: impl Into<String>) -> Self {
        Self::new(text, OutputStyle::Path)
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, OutputStyle::Error)
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, OutputStyle::Success)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn style(&self) -> OutputStyle {
        self.style
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.style == OutputStyle::Error
    }
}
