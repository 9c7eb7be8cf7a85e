//! Moving around the filesystem and recovering from mistakes.

use std::fs;

use crate::common::TestShell;

#[tokio::test]
async fn walk_down_and_back_up() {
    let mut t = TestShell::new();
    fs::create_dir_all(t.home().join("projects/nebula")).unwrap();

    t.run("go projects").await;
    t.run("go nebula").await;
    assert_eq!(
        t.shell.session().working_dir(),
        t.home().join("projects/nebula")
    );
    assert!(t.shell.prompt().ends_with("nebula> "));

    t.run("go ../..").await;
    assert_eq!(t.shell.session().working_dir(), t.home());
}

#[tokio::test]
async fn typo_suggests_then_recovers() {
    let mut t = TestShell::new();
    fs::create_dir(t.home().join("projects")).unwrap();

    let out = t.run("projetcs").await;
    assert_eq!(
        out,
        vec![
            "Command 'projetcs' not recognized. Type 'help' for a list of available commands.",
            "Did you mean: projects?",
        ]
    );

    t.run("go projects").await;
    assert_eq!(t.shell.session().working_dir(), t.home().join("projects"));
}

#[tokio::test]
async fn failures_leave_the_session_usable() {
    let mut t = TestShell::new();
    let start = t.shell.session().working_dir().to_path_buf();

    for line in ["go missing", "edit nothing.txt", "rename a b", "settings -nope 1"] {
        let out = t.run(line).await;
        assert_eq!(out.len(), 1, "{line}: {out:?}");
    }
    assert_eq!(t.shell.session().working_dir(), start);
    assert_eq!(t.run("echo still here").await, vec!["still here"]);
}

#[tokio::test]
async fn exit_returns_home_from_anywhere() {
    let mut t = TestShell::new();
    fs::create_dir_all(t.home().join("a/b/c")).unwrap();
    t.run("go a/b/c").await;
    t.run("exit").await;
    assert_eq!(t.shell.session().working_dir(), t.home());
}

#[tokio::test]
async fn history_recalls_submitted_lines() {
    let mut t = TestShell::new();
    assert!(t.submit("echo first").await);
    assert!(t.submit("echo second").await);

    t.shell.history_up();
    assert_eq!(t.shell.input().text(), "echo second");
    t.shell.history_up();
    assert_eq!(t.shell.input().text(), "echo first");
    t.shell.history_down();
    assert_eq!(t.shell.input().text(), "echo second");
}

#[tokio::test]
async fn tab_completes_paths_relative_to_working_dir() {
    let mut t = TestShell::new();
    fs::create_dir(t.home().join("Documents")).unwrap();
    fs::create_dir(t.home().join("Downloads")).unwrap();

    t.shell.input_mut().set_text("go Doc".to_string());
    t.shell.complete();
    assert_eq!(t.shell.input().text(), "go Documents/");

    t.shell.input_mut().set_text("go Do".to_string());
    t.shell.complete();
    assert_eq!(t.shell.input().text(), "go Do");
    assert_eq!(
        t.shell.transcript().last().map(|e| e.text()),
        Some("Documents  Downloads")
    );
}
