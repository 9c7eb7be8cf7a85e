//! `issue` end to end against a mock webhook.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::TestShell;

#[tokio::test]
async fn numbered_issues_are_posted_in_order() {
    let server = MockServer::start().await;
    for (n, text) in [(1, "first bug"), (2, "second bug")] {
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({
                "content": format!("**Community Issue #{n}**:\n```{text}```"),
                "username": "Nebula Terminal Community Issues",
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut t = TestShell::with_webhook(format!("{}/hook", server.uri()));
    assert_eq!(
        t.run("issue first bug").await,
        vec!["Issue #1 submitted. Thank you!"]
    );
    assert_eq!(
        t.run("issue second bug").await,
        vec!["Issue #2 submitted. Thank you!"]
    );
    assert_eq!(t.shell.session().issue_counter(), 2);
}

#[tokio::test]
async fn rejected_issue_keeps_its_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut t = TestShell::with_webhook(server.uri());
    assert_eq!(
        t.run("issue flaky").await,
        vec!["Failed to submit issue: HTTP 500"]
    );
    assert_eq!(t.shell.session().issue_counter(), 0);

    assert_eq!(
        t.run("issue flaky").await,
        vec!["Issue #1 submitted. Thank you!"]
    );
}

#[tokio::test]
async fn unconfigured_webhook_is_an_error() {
    let mut t = TestShell::new();
    let out = t.run("issue hello").await;
    assert_eq!(
        out,
        vec!["Failed to submit issue: no issue webhook is configured"]
    );
    assert!(t.shell.transcript().last().unwrap().is_error());
}
