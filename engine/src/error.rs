//! Failures a command handler can report.
//!
//! Nothing here is fatal: the dispatcher renders every variant as one
//! error-styled event and the prompt comes back.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use nebula_tools::{NotifyError, RunError};
use nebula_types::{OutputEvent, OutputStyle, SettingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Directory not found: {}. Please check the path and try again.", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("File not found: {}. Please verify the file path and try again.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error {action}: {source}")]
    Os {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Invalid setting or value type for: {key}. {source}")]
    Validation {
        key: String,
        #[source]
        source: SettingError,
    },

    #[error("Command '{0}' not recognized. Type 'help' for a list of available commands.")]
    UnknownCommand(String),

    #[error("{context}: {message}")]
    Collaborator { context: String, message: String },

    #[error("{context}: operation timed out after {}s", elapsed.as_secs())]
    Timeout { context: String, elapsed: Duration },
}

impl CommandError {
    pub(crate) fn os(action: &'static str, source: io::Error) -> Self {
        Self::Os { action, source }
    }

    pub(crate) fn collaborator(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Map a runner failure, keeping timeouts distinct.
    pub(crate) fn from_run(context: impl Into<String>, err: RunError) -> Self {
        match err {
            RunError::TimedOut { elapsed, .. } => Self::Timeout {
                context: context.into(),
                elapsed,
            },
            other => Self::collaborator(context, other.to_string()),
        }
    }

    pub(crate) fn from_notify(err: &NotifyError) -> Self {
        Self::collaborator("Failed to submit issue", err.to_string())
    }

    /// Short tag for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::DirectoryNotFound(_) | Self::FileNotFound(_) => "not_found",
            Self::Os { .. } => "os",
            Self::Validation { .. } => "validation",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Collaborator { .. } => "collaborator",
            Self::Timeout { .. } => "timeout",
        }
    }

    /// Render as a transcript event. OS and collaborator text is untrusted.
    #[must_use]
    pub fn to_event(&self) -> OutputEvent {
        OutputEvent::untrusted(&self.to_string(), OutputStyle::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CommandError::Usage("mkdir <directory_name>").to_string(),
            "Usage: mkdir <directory_name>"
        );
        assert_eq!(
            CommandError::UnknownCommand("frobnicate".into()).to_string(),
            "Command 'frobnicate' not recognized. Type 'help' for a list of available commands."
        );
        let err = CommandError::DirectoryNotFound(PathBuf::from("nowhere"));
        assert_eq!(
            err.to_string(),
            "Directory not found: nowhere. Please check the path and try again."
        );
    }

    #[test]
    fn timeout_is_distinct_from_other_runner_failures() {
        let err = CommandError::from_run(
            "Failed to ping example.com",
            RunError::TimedOut {
                program: "ping".into(),
                elapsed: Duration::from_secs(30),
            },
        );
        assert_eq!(err.kind(), "timeout");
        assert_eq!(
            err.to_string(),
            "Failed to ping example.com: operation timed out after 30s"
        );

        let err = CommandError::from_run(
            "Failed to open editor",
            RunError::NotFound {
                program: "code".into(),
            },
        );
        assert_eq!(err.kind(), "collaborator");
        assert!(err.to_string().contains("code is not installed"));
    }

    #[test]
    fn events_are_error_styled() {
        let event = CommandError::collaborator("x", "\x1b[31mboom").to_event();
        assert!(event.is_error());
        assert_eq!(event.text(), "x: boom");
    }
}
