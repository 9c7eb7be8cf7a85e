//! The object a front-end drives: greeting, line editing and command runs.

use std::time::Duration;

use nebula_types::OutputEvent;

use crate::commands::{PROMPT_DELIMITER, ParsedCommand};
use crate::completion::{Completion, complete};
use crate::countdown::{CountdownSequencer, CountdownStep};
use crate::dispatch::{Dispatcher, Effects};
use crate::history::InputHistory;
use crate::input::DraftInput;
use crate::session::SessionState;
use crate::settings::SettingsStore;
use crate::transcript::Transcript;

pub struct Shell {
    session: SessionState,
    settings: SettingsStore,
    dispatcher: Dispatcher,
    countdown: CountdownSequencer,
    transcript: Transcript,
    input: DraftInput,
    history: InputHistory,
    clear_transcript: bool,
    settings_changed: bool,
}

impl Shell {
    #[must_use]
    pub fn new(session: SessionState, settings: SettingsStore, dispatcher: Dispatcher) -> Self {
        Self {
            session,
            settings,
            dispatcher,
            countdown: CountdownSequencer::default(),
            transcript: Transcript::default(),
            input: DraftInput::default(),
            history: InputHistory::default(),
            clear_transcript: false,
            settings_changed: false,
        }
    }

    /// Replace the default one-second countdown interval.
    #[must_use]
    pub fn with_countdown(mut self, countdown: CountdownSequencer) -> Self {
        self.countdown = countdown;
        self
    }

    /// Show the greeting. A returning user goes straight to the prompt.
    pub fn begin(&mut self, user: &str, returning: bool) {
        if !returning {
            self.transcript.extend([
                OutputEvent::bold("Initializing Terminal..."),
                OutputEvent::bold(format!("User: {user}")),
                OutputEvent::bold("Access Granted"),
            ]);
        }
        if let Some(step) = self.countdown.start(returning) {
            self.apply_countdown_step(step, true);
        }
        tracing::info!(user, returning, "Session started");
    }

    /// Feed elapsed frame time to the greeting countdown.
    pub fn tick(&mut self, delta: Duration) {
        for step in self.countdown.advance(delta) {
            self.apply_countdown_step(step, false);
        }
    }

    fn apply_countdown_step(&mut self, step: CountdownStep, first: bool) {
        match step {
            CountdownStep::Show(n) => {
                let line = OutputEvent::bold(format!("Continuing in {n}..."));
                if first {
                    self.transcript.push(line);
                } else {
                    self.transcript.replace_last(line);
                }
            }
            CountdownStep::Finished => {
                self.transcript.clear();
                self.clear_transcript = true;
            }
        }
    }

    /// Input is accepted once the greeting has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.countdown.is_done()
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        format!("{}{PROMPT_DELIMITER}", self.session.working_dir().display())
    }

    /// Submit the input line. Returns `false` when input is not accepted yet.
    pub async fn submit(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let line = self.input.take_text();
        self.history.push(line.clone());
        self.run_line(&line).await;
        true
    }

    /// Echo `line` after the prompt, then parse and dispatch it.
    pub async fn run_line(&mut self, line: &str) -> Effects {
        let prompt = self.prompt();
        self.transcript
            .push(OutputEvent::command(format!("{prompt}{line}")));

        let parsed = ParsedCommand::parse(line, &prompt);
        if parsed.is_empty() {
            return Effects::default();
        }
        let dispatch = self
            .dispatcher
            .dispatch(&parsed, &mut self.session, &mut self.settings)
            .await;

        if dispatch.effects.clear_screen {
            self.transcript.clear();
            self.clear_transcript = true;
        }
        if dispatch.effects.settings_changed {
            self.settings_changed = true;
        }
        self.transcript.extend(dispatch.events);
        dispatch.effects
    }

    /// Tab: complete the text before the cursor.
    pub fn complete(&mut self) {
        if !self.is_ready() {
            return;
        }
        let before = self.input.before_cursor().to_string();
        let after = self.input.text()[self.input.byte_index()..].to_string();
        match complete(&before, &self.session, self.dispatcher.filesystem()) {
            Completion::None => {}
            Completion::Line(line) => self.splice_completion(line, &after),
            Completion::Candidates { line, candidates } => {
                self.transcript
                    .push(OutputEvent::path(candidates.join("  ")));
                self.splice_completion(line, &after);
            }
        }
    }

    fn splice_completion(&mut self, completed: String, after: &str) {
        self.input.set_text(completed);
        let cursor = self.input.cursor();
        self.input.enter_text(after);
        while self.input.cursor() > cursor {
            self.input.move_cursor_left();
        }
    }

    pub fn history_up(&mut self) {
        if let Some(line) = self.history.navigate_up(self.input.text()) {
            let line = line.to_string();
            self.input.set_text(line);
        }
    }

    pub fn history_down(&mut self) {
        if let Some(line) = self.history.navigate_down() {
            self.input.set_text(line);
        }
    }

    #[must_use]
    pub fn input(&self) -> &DraftInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut DraftInput {
        &mut self.input
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Whether the screen must be wiped before the next draw. Resets on read.
    pub fn take_clear_transcript(&mut self) -> bool {
        std::mem::take(&mut self.clear_transcript)
    }

    /// Whether display parameters must be re-derived. Resets on read.
    pub fn take_settings_changed(&mut self) -> bool {
        std::mem::take(&mut self.settings_changed)
    }
}
