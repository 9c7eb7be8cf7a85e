//! Commands that shell out, with scripted and real process runners.

use std::time::Duration;

use nebula_engine::{Collaborators, Dispatcher, SessionState, SettingsStore, Shell};
use nebula_tools::{
    LocalFilesystem, ProcessOutput, RunError, SystemCommand, SystemProcessRunner, WebhookNotifier,
};

use crate::common::{NoPorts, TestShell};

#[tokio::test]
async fn captured_output_is_shown_verbatim() {
    let mut t = TestShell::new();
    t.runner.push_stdout("PID TTY CMD\n1 ? init\n");
    t.runner.push_stdout("Linux box 6.1.0\n");

    assert_eq!(t.run("tasklist").await, vec!["PID TTY CMD\n1 ? init\n"]);
    assert_eq!(t.run("systeminfo").await, vec!["Linux box 6.1.0\n"]);
    assert_eq!(
        t.runner.calls(),
        vec![SystemCommand::TaskList, SystemCommand::SystemInfo]
    );
}

#[tokio::test]
async fn runner_timeout_is_distinct_from_failure() {
    let mut t = TestShell::new();
    t.runner.push(Err(RunError::TimedOut {
        program: "ssh".to_string(),
        elapsed: Duration::from_secs(30),
    }));
    t.runner.push(Ok(ProcessOutput {
        exit_code: Some(255),
        stderr: "Connection refused".to_string(),
        ..ProcessOutput::default()
    }));

    assert_eq!(
        t.run("ssh me@slow").await,
        vec!["Failed to establish SSH connection to me@slow: operation timed out after 30s"]
    );
    assert_eq!(
        t.run("ssh me@down").await,
        vec!["SSH connection to me@down failed with error code 255: Connection refused"]
    );
}

#[tokio::test]
async fn ssh_success_shows_remote_output() {
    let mut t = TestShell::new();
    t.runner.push_stdout("welcome\n");
    assert_eq!(
        t.run("ssh me@host").await,
        vec!["SSH connection to me@host established:\nwelcome\n"]
    );
}

#[tokio::test]
async fn unparseable_disk_usage_falls_back_to_raw_output() {
    let mut t = TestShell::new();
    t.runner.push_stdout("Total free bytes : 100\n");
    assert_eq!(t.run("diskusage").await, vec!["Total free bytes : 100\n"]);
}

#[tokio::test]
async fn usage_errors_do_not_reach_the_runner() {
    let mut t = TestShell::new();
    assert_eq!(t.run("ping").await, vec!["Usage: ping <target>"]);
    assert_eq!(t.run("ssh").await, vec!["Usage: ssh <target>"]);
    assert_eq!(t.run("git status").await, vec!["Usage: git clone <repository-url>"]);
    assert!(t.runner.calls().is_empty());
}

#[tokio::test]
async fn real_git_clone_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(Collaborators {
        runner: Box::new(SystemProcessRunner::new(Duration::from_secs(30))),
        fs: Box::new(LocalFilesystem),
        notifier: Box::new(WebhookNotifier::new(None, "tests").unwrap()),
        ports: Box::new(NoPorts),
    });
    let home = dir.path().to_path_buf();
    let mut shell = Shell::new(
        SessionState::new(home.clone(), home),
        SettingsStore::new(),
        dispatcher,
    );
    shell.begin("tester", true);

    let missing = dir.path().join("no-such-repo");
    shell
        .run_line(&format!("git clone {}", missing.display()))
        .await;

    // Whether or not git is installed, the failure comes back as one error line.
    let last = shell.transcript().last().unwrap();
    assert!(last.is_error());
    assert!(
        last.text().starts_with("Failed to clone repository: "),
        "{}",
        last.text()
    );
}
