//! Command interpreter and session engine for Nebula.
//!
//! This crate owns everything between a submitted line and the styled output
//! it produces. It has no terminal dependencies; the TUI drives a [`Shell`].

mod commands;
mod completion;
mod countdown;
mod dispatch;
mod error;
mod history;
mod input;
mod session;
mod settings;
mod shell;
mod suggest;
mod transcript;

pub use commands::{
    CommandCategory, CommandSpec, PROMPT_DELIMITER, ParsedCommand, command_names, command_specs,
    detailed_help, find_spec, general_help,
};
pub use completion::{Completion, complete};
pub use countdown::{
    COUNTDOWN_FROM, COUNTDOWN_INTERVAL, CountdownSequencer, CountdownState, CountdownStep,
};
pub use dispatch::{
    Collaborators, DIR_LISTING_LIMIT, Dispatch, Dispatcher, Effects, PROBED_PORTS,
};
pub use error::CommandError;
pub use history::InputHistory;
pub use input::DraftInput;
pub use session::{SessionState, default_start_dir, normalize_lexically};
pub use settings::SettingsStore;
pub use shell::Shell;
pub use suggest::{SIMILARITY_CUTOFF, SuggestionResult, best_match, suggest};
pub use transcript::Transcript;

pub use nebula_types::{OutputEvent, OutputStyle};
