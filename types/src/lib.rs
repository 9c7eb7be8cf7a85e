//! Core domain types for Nebula.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod output;
mod sanitize;
mod settings;

pub use output::{OutputEvent, OutputStyle};
pub use sanitize::sanitize_terminal_text;
pub use settings::{CursorShape, SettingError, SettingKey, SettingKind, SettingValue};
