//! End-to-end submission tests against a fake chat backend.

use std::time::Duration;

use httpmock::prelude::*;
use mental_coach::error::GENERIC_ERROR;
use mental_coach::render::response_lines;
use mental_coach::{App, ChatClient, ChatError};
use serde_json::json;

fn app_for(server: &MockServer) -> App {
    App::new(ChatClient::new(&server.base_url()))
}

async fn settle(app: &mut App) {
    let waited = tokio::time::timeout(Duration::from_secs(10), async {
        while app.loading {
            app.poll_pending().await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    waited.expect("request settles");
}

#[tokio::test]
async fn reply_is_shown_and_draft_cleared() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .header("content-type", "application/json")
                .json_body(json!({ "message": "I feel stressed" }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "reply": "Hello\nWorld" }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("I feel stressed");
    assert!(app.submit_and_wait().await);

    mock.assert_async().await;
    let response = app.response.as_deref().expect("reply stored");
    assert_eq!(response_lines(response), vec!["Hello", "World"]);
    assert!(app.draft.is_empty());
    assert!(app.error.is_none());
    assert!(!app.loading);
}

#[tokio::test]
async fn message_is_sent_untrimmed() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .json_body(json!({ "message": "  padded \n" }));
            then.status(200).json_body(json!({ "reply": "ok" }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("  padded \n");
    app.submit_and_wait().await;

    mock.assert_async().await;
    assert_eq!(app.response.as_deref(), Some("ok"));
}

#[tokio::test]
async fn blank_input_sends_nothing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({ "reply": "should not happen" }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft(" \t\n ");
    assert!(!app.submit_and_wait().await);
    app.submit();
    assert!(app.pending.is_none());

    assert_eq!(mock.hits_async().await, 0);
    assert!(app.response.is_none());
    assert!(app.error.is_none());
    assert!(!app.loading);
    assert_eq!(app.draft, " \t\n ");
}

#[tokio::test]
async fn server_detail_is_shown_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(429).json_body(json!({ "detail": "Rate limited" }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("hello?");
    app.submit_and_wait().await;

    assert_eq!(app.error.as_deref(), Some("Rate limited"));
    assert!(app.response.is_none());
    assert_eq!(app.draft, "hello?");
    assert!(!app.loading);
}

#[tokio::test]
async fn unparsable_error_body_names_the_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(502).body("<html><body>Bad Gateway</body></html>");
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("hello?");
    app.submit_and_wait().await;

    let error = app.error.as_deref().expect("error stored");
    assert!(error.contains("502"), "unexpected error text: {error}");
    assert!(app.response.is_none());
}

#[tokio::test]
async fn json_error_without_detail_uses_status_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(500).json_body(json!({ "error": "internal" }));
        })
        .await;

    let client = ChatClient::new(&server.base_url());
    let err = client.send("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn malformed_reply_uses_generic_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({ "answer": "wrong field" }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("hi");
    app.submit_and_wait().await;

    assert_eq!(app.error.as_deref(), Some(GENERIC_ERROR));
    assert!(app.response.is_none());
    assert_eq!(app.draft, "hi");
}

#[tokio::test]
async fn unreachable_backend_reports_transport_error() {
    // Nothing listens on the discard port
    let mut app = App::new(ChatClient::new("http://127.0.0.1:9"));
    app.set_draft("hi");
    app.submit_and_wait().await;

    let error = app.error.as_deref().expect("error stored");
    assert!(!error.is_empty());
    assert!(app.response.is_none());
    assert!(!app.loading);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submit_control_is_disabled_until_the_request_settles() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(json!({ "reply": "Take a slow breath." }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("I can't sleep");
    app.submit();

    assert!(app.loading);
    assert!(!app.can_submit());
    assert_eq!(app.button_label(), "Sending...");

    // Still pending: polling must not settle it early
    app.poll_pending().await;
    assert!(app.loading);

    settle(&mut app).await;
    assert!(!app.loading);
    assert_eq!(app.button_label(), "Send Message");
    assert_eq!(app.response.as_deref(), Some("Take a slow breath."));
    assert!(app.pending.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn each_request_clears_the_previous_outcome() {
    let server = MockServer::start_async().await;
    let mut failing = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(503).json_body(json!({ "detail": "Coach is resting" }));
        })
        .await;

    let mut app = app_for(&server);
    app.set_draft("first try");
    app.submit();
    settle(&mut app).await;
    assert_eq!(app.error.as_deref(), Some("Coach is resting"));
    assert!(app.response.is_none());

    failing.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({ "reply": "Welcome back." }));
        })
        .await;

    app.submit();
    assert!(app.error.is_none());
    assert!(app.response.is_none());
    settle(&mut app).await;

    assert_eq!(app.response.as_deref(), Some("Welcome back."));
    assert!(app.error.is_none());
    assert!(app.draft.is_empty());
}
