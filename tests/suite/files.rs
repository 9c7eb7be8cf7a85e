//! File commands against a real temp directory.

use crate::common::TestShell;

#[tokio::test]
async fn mkdir_rename_and_listing() {
    let mut t = TestShell::new();

    assert_eq!(t.run("mkdir notes").await, vec!["Directory created: notes"]);
    t.run("go notes").await;
    t.write("notes/draft.txt", "first draft\n");

    assert_eq!(
        t.run("rename draft.txt final.txt").await,
        vec!["File renamed from draft.txt to final.txt"]
    );
    let listing = t.run("dir").await;
    assert_eq!(listing.len(), 1);
    assert!(listing[0].contains("final.txt"));
    assert!(!listing[0].contains("draft.txt"));
}

#[tokio::test]
async fn diff_reports_changed_lines() {
    let mut t = TestShell::new();
    t.write("v1.txt", "alpha\nbeta\ngamma\n");
    t.write("v2.txt", "alpha\nBETA\ngamma\ndelta\n");

    let out = t.run("diff v1.txt v2.txt").await;
    assert_eq!(out.len(), 2);
    assert!(out[0].starts_with("Differences between "));
    assert!(out[0].ends_with("(+2 -1):"));
    let body = &out[1];
    assert!(body.lines().any(|l| l == "-beta"));
    assert!(body.lines().any(|l| l == "+BETA"));
    assert!(body.lines().any(|l| l == "+delta"));
}

#[tokio::test]
async fn diff_of_identical_files_is_one_line() {
    let mut t = TestShell::new();
    t.write("a.txt", "same\n");
    t.write("b.txt", "same\n");

    let out = t.run("diff a.txt b.txt").await;
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("No differences found between "));
}

#[tokio::test]
async fn openfile_accepts_paths_with_spaces() {
    let mut t = TestShell::new();
    let path = t.write("My Notes/todo list.txt", "buy milk");

    let out = t.run("openfile My Notes/todo list.txt").await;
    assert_eq!(
        out,
        vec![format!("Contents of {}:", path.display()), "buy milk".to_string()]
    );
}

#[tokio::test]
async fn control_sequences_in_files_are_not_replayed() {
    let mut t = TestShell::new();
    t.write("evil.txt", "safe\x1b]0;pwned\x07 text\x1b[2J");

    assert_eq!(t.run("edit evil.txt").await, vec!["safe text"]);
}

#[tokio::test]
async fn cls_wipes_transcript_and_flags_redraw() {
    let mut t = TestShell::new();
    t.run("echo one").await;
    t.run("echo two").await;

    t.shell.run_line("clear").await;
    assert!(t.shell.transcript().is_empty());
    assert!(t.shell.take_clear_transcript());
}
