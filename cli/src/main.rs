//! Nebula CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI wires real collaborators into a [`nebula_engine::Shell`] and drives
//! it from a fixed-cadence frame loop rendered by [`nebula_tui`].
//!
//! ```text
//! main() -> build_shell() -> TerminalSession::new() -> run_shell() -> Shell + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`nebula_tui::InputPump`])
//! 3. Feed elapsed time to the greeting countdown (`shell.tick()`)
//! 4. Handle transcript clear requests and settings changes
//! 5. Render frame

mod identity;

use anyhow::{Context, Result};
use crossterm::{
    cursor::SetCursorStyle,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use nebula_config::{KnownIdentities, NebulaConfig};
use nebula_engine::{Collaborators, Dispatcher, SessionState, SettingsStore, Shell, default_start_dir};
use nebula_tools::{LocalFilesystem, SystemProcessRunner, TcpPortProbe, WebhookNotifier};
use nebula_tui::{InputPump, Ui, draw, handle_events};

/// Log to `~/.nebula/logs/nebula.log`. The TUI owns the terminal, so there is
/// no stderr layer.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_nebula_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(
            path = %log_path.display(),
            version = env!("CARGO_PKG_VERSION"),
            "Logging initialized"
        );
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_nebula_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in nebula_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn nebula_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.nebula/logs/nebula.log
    if let Some(path) = nebula_config::log_file_path() {
        candidates.push(path);
    }

    // Fallback: ./.nebula/logs/nebula.log
    candidates.push(PathBuf::from(".nebula").join("logs").join("nebula.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, bracketed paste, the alternate screen and the cursor shape are
/// restored on drop, so the terminal stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new(cursor: SetCursorStyle) -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableBracketedPaste, cursor) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(
                    stdout(),
                    SetCursorStyle::DefaultUserShape,
                    LeaveAlternateScreen,
                    DisableBracketedPaste
                );
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            SetCursorStyle::DefaultUserShape,
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

fn load_config() -> NebulaConfig {
    match NebulaConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(path = %err.path().display(), error = %err, "Ignoring config file");
            NebulaConfig::default()
        }
    }
}

fn start_dir(config: &NebulaConfig, home: &Path) -> PathBuf {
    if let Some(dir) = config.start_dir(home) {
        if dir.is_dir() {
            return dir;
        }
        tracing::warn!(path = %dir.display(), "Configured start_dir is not a directory");
    }
    default_start_dir()
}

fn settings_from(config: &NebulaConfig) -> SettingsStore {
    let mut settings = SettingsStore::new();
    let overrides = config.setting_overrides();
    let errors = settings.apply_overrides(
        overrides
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    for err in errors {
        tracing::warn!(error = %err, "Skipping settings override");
    }
    settings
}

/// First run for this identity plays the full greeting.
fn is_returning(config: &NebulaConfig, home: &Path, identity: &str) -> bool {
    let path = config
        .known_users_path(home)
        .or_else(nebula_config::known_users_path)
        .unwrap_or_else(|| home.join(".nebula").join("known_users"));
    match KnownIdentities::new(path).check_and_record(identity) {
        Ok(returning) => returning,
        Err(err) => {
            tracing::warn!(error = %err, "Known identities unavailable, showing greeting");
            false
        }
    }
}

fn build_shell(config: &NebulaConfig) -> Result<(Shell, String, bool)> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let notifier = WebhookNotifier::new(config.webhook_url(), config.issue_username())
        .context("failed to build issue webhook client")?;
    if !notifier.is_configured() {
        tracing::info!("No issue webhook configured; `issue` will report an error");
    }

    let dispatcher = Dispatcher::new(Collaborators {
        runner: Box::new(SystemProcessRunner::new(config.command_timeout())),
        fs: Box::new(LocalFilesystem),
        notifier: Box::new(notifier),
        ports: Box::new(TcpPortProbe::new(config.port_probe_timeout())),
    });
    let session = SessionState::new(home.clone(), start_dir(config, &home));

    let user = identity::username();
    let id = identity::identity(&user, identity::hostname().as_deref());
    let returning = is_returning(config, &home, &id);

    Ok((
        Shell::new(session, settings_from(config), dispatcher),
        user,
        returning,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let (mut shell, user, returning) = build_shell(&config)?;
    let mut ui = Ui::new(shell.settings());

    let result = {
        let mut session = TerminalSession::new(ui.theme().cursor_style())?;
        shell.begin(&user, returning);
        run_shell(&mut session.terminal, &mut shell, &mut ui).await
    };

    match &result {
        Ok(()) => tracing::info!("Session ended"),
        Err(err) => tracing::error!(error = ?err, "Session ended with error"),
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_shell<B>(terminal: &mut Terminal<B>, shell: &mut Shell, ui: &mut Ui) -> Result<()>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(shell, ui, &mut input).await {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        let now = Instant::now();
        shell.tick(now.duration_since(last_frame));
        last_frame = now;

        if shell.take_clear_transcript()
            && let Err(e) = terminal.clear()
        {
            break Err(e.into());
        }

        if shell.take_settings_changed() {
            ui.refresh_theme(shell.settings());
            if let Err(e) = execute!(terminal.backend_mut(), ui.theme().cursor_style()) {
                break Err(e.into());
            }
        }

        if let Err(e) = terminal.draw(|frame| draw(frame, shell, ui)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
