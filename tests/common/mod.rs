//! Shared test utilities and fixtures
//!
//! Shells wired to a real filesystem in a temp dir, with scripted stand-ins
//! for processes and ports.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use nebula_engine::{Collaborators, Dispatcher, SessionState, SettingsStore, Shell};
use nebula_tools::{
    IssueNotifier, LocalFilesystem, PortProbe, ProbeFut, ProcessOutput, ProcessRunner, RunError,
    RunFut, SystemCommand, WebhookNotifier,
};
use tempfile::TempDir;

/// Process runner that replays scripted results and records every call.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    calls: Arc<Mutex<Vec<SystemCommand>>>,
    script: Arc<Mutex<VecDeque<Result<ProcessOutput, RunError>>>>,
}

impl ScriptedRunner {
    pub fn push(&self, result: Result<ProcessOutput, RunError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn push_stdout(&self, stdout: &str) {
        self.push(Ok(ProcessOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            ..ProcessOutput::default()
        }));
    }

    pub fn calls(&self) -> Vec<SystemCommand> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run<'a>(&'a self, command: &'a SystemCommand, _cwd: &'a Path) -> RunFut<'a> {
        self.calls.lock().unwrap().push(command.clone());
        let next = self.script.lock().unwrap().pop_front();
        Box::pin(async move {
            next.unwrap_or_else(|| {
                Ok(ProcessOutput {
                    exit_code: Some(0),
                    ..ProcessOutput::default()
                })
            })
        })
    }
}

pub struct NoPorts;

impl PortProbe for NoPorts {
    fn open_ports(&self, _ports: RangeInclusive<u16>) -> ProbeFut<'_> {
        Box::pin(async { Vec::new() })
    }
}

/// A shell rooted in a fresh temp home, past the greeting.
pub struct TestShell {
    pub dir: TempDir,
    pub runner: ScriptedRunner,
    pub shell: Shell,
}

impl TestShell {
    pub fn new() -> Self {
        Self::with_notifier(Box::new(WebhookNotifier::new(None, "tests").unwrap()))
    }

    pub fn with_webhook(url: String) -> Self {
        Self::with_notifier(Box::new(
            WebhookNotifier::new(Some(url), "Nebula Terminal Community Issues").unwrap(),
        ))
    }

    pub fn with_notifier(notifier: Box<dyn IssueNotifier>) -> Self {
        let mut t = Self::build(notifier);
        t.shell.begin("tester", true);
        t.shell.take_clear_transcript();
        t
    }

    /// A shell that has not shown its greeting yet.
    pub fn not_started() -> Self {
        Self::build(Box::new(WebhookNotifier::new(None, "tests").unwrap()))
    }

    fn build(notifier: Box<dyn IssueNotifier>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().to_path_buf();
        let runner = ScriptedRunner::default();
        let dispatcher = Dispatcher::new(Collaborators {
            runner: Box::new(runner.clone()),
            fs: Box::new(LocalFilesystem),
            notifier,
            ports: Box::new(NoPorts),
        });
        let shell = Shell::new(
            SessionState::new(home.clone(), home),
            SettingsStore::new(),
            dispatcher,
        );
        Self { dir, runner, shell }
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Run one line and return the text of each event it produced.
    pub async fn run(&mut self, line: &str) -> Vec<String> {
        let before = self.shell.transcript().len();
        self.shell.run_line(line).await;
        self.shell.transcript().events()[before + 1..]
            .iter()
            .map(|e| e.text().to_string())
            .collect()
    }

    /// Type `line` into the input and press Enter.
    pub async fn submit(&mut self, line: &str) -> bool {
        self.shell.input_mut().set_text(line.to_string());
        self.shell.submit().await
    }
}
