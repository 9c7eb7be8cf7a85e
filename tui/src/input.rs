//! Input handling for Nebula TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use nebula_engine::Shell;

use crate::Ui;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and queues them for the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Unblock a sender waiting on capacity before joining.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued input into the shell. Returns `true` when the user quit.
pub async fn handle_events(shell: &mut Shell, ui: &mut Ui, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(shell, ui, ev).await {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(false)
}

async fn apply_event(shell: &mut Shell, ui: &mut Ui, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return false;
            }
            if is_quit(key) {
                return true;
            }
            // Nothing is accepted while the greeting counts down.
            if shell.is_ready() {
                handle_key(shell, ui, key).await;
            }
        }
        Event::Paste(text) if shell.is_ready() => {
            let single_line = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
            shell.input_mut().enter_text(&single_line);
        }
        _ => {}
    }
    false
}

fn is_quit(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'd'))
}

async fn handle_key(shell: &mut Shell, ui: &mut Ui, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            ui.scroll_to_bottom();
            shell.submit().await;
        }
        KeyCode::Tab => shell.complete(),
        KeyCode::Up => shell.history_up(),
        KeyCode::Down => shell.history_down(),
        KeyCode::PageUp => ui.scroll_up(),
        KeyCode::PageDown => ui.scroll_down(),
        KeyCode::Left => shell.input_mut().move_cursor_left(),
        KeyCode::Right => shell.input_mut().move_cursor_right(),
        KeyCode::Home => shell.input_mut().move_cursor_home(),
        KeyCode::End => shell.input_mut().move_cursor_end(),
        KeyCode::Backspace => shell.input_mut().delete_char(),
        KeyCode::Delete => shell.input_mut().delete_char_forward(),
        KeyCode::Char('w') if ctrl => shell.input_mut().delete_word_backwards(),
        KeyCode::Char('u') if ctrl => shell.input_mut().clear(),
        KeyCode::Char('a') if ctrl => shell.input_mut().move_cursor_home(),
        KeyCode::Char('e') if ctrl => shell.input_mut().move_cursor_end(),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            shell.input_mut().enter_char(c);
        }
        _ => {}
    }
}
