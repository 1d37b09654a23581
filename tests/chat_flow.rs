mod common;

use ayan_chat::{App, ERROR_OCCURRED, NO_RESPONSE, Role};
use common::{client_for, dead_base_url, serve_held, serve_once};

fn contents(app: &App) -> Vec<(Role, String)> {
    app.session
        .transcript()
        .iter()
        .map(|msg| (msg.role, msg.content.clone()))
        .collect()
}

#[tokio::test]
async fn test_question_and_answer_scenario() {
    let mut stub = serve_held(200, r#"{"candidates":[{"content":{"parts":[{"text":"4"}]}}]}"#).await;
    let mut app = App::new(client_for(&stub.base_url));

    app.session.set_input("2+2?");
    app.send_message();

    assert_eq!(contents(&app), vec![(Role::User, "2+2?".to_string())]);
    assert!(app.is_awaiting_response());

    // Still outstanding until the stub answers
    stub.request.await.unwrap();
    assert!(!app.poll_reply().await);
    assert!(app.is_awaiting_response());

    stub.release.take().unwrap().send(()).unwrap();
    assert!(app.wait_for_reply().await);

    assert_eq!(
        contents(&app),
        vec![
            (Role::User, "2+2?".to_string()),
            (Role::Assistant, "4".to_string()),
        ]
    );
    assert!(!app.is_awaiting_response());
}

#[tokio::test]
async fn test_missing_reply_uses_fallback() {
    let stub = serve_once(200, "{}").await;
    let mut app = App::new(client_for(&stub.base_url));

    app.session.set_input("hello?");
    app.send_message();
    app.wait_for_reply().await;

    assert_eq!(app.session.transcript()[1].content, NO_RESPONSE);
}

#[tokio::test]
async fn test_transport_failure_uses_error_message() {
    let mut app = App::new(client_for(&dead_base_url().await));

    app.session.set_input("anyone there?");
    app.send_message();
    app.wait_for_reply().await;

    assert_eq!(app.session.transcript()[1].content, ERROR_OCCURRED);
    assert!(!app.is_awaiting_response());
}

#[tokio::test]
async fn test_error_status_uses_error_message() {
    let stub = serve_once(429, r#"{"error":{"code":429}}"#).await;
    let mut app = App::new(client_for(&stub.base_url));

    app.session.set_input("again");
    app.send_message();
    app.wait_for_reply().await;

    assert_eq!(app.session.transcript()[1].content, ERROR_OCCURRED);
}

#[tokio::test]
async fn test_only_one_call_in_flight() {
    let mut stub = serve_held(200, r#"{"candidates":[{"content":{"parts":[{"text":"first"}]}}]}"#).await;
    let mut app = App::new(client_for(&stub.base_url));

    app.session.set_input("first");
    app.send_message();
    app.session.set_input("second");
    app.send_message();

    assert_eq!(app.session.transcript().len(), 1);
    assert_eq!(app.session.pending_input(), "second");

    stub.release.take().unwrap().send(()).unwrap();
    app.wait_for_reply().await;

    assert_eq!(app.session.transcript().len(), 2);
    assert_eq!(app.session.pending_input(), "second");
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let mut app = App::new(client_for(&dead_base_url().await));

    app.session.set_input("   ");
    app.send_message();

    assert!(app.session.transcript().is_empty());
    assert_eq!(app.session.pending_input(), "   ");
    assert!(!app.is_awaiting_response());
    assert!(!app.wait_for_reply().await);
}

#[tokio::test]
async fn test_ask_returns_reply() {
    let stub = serve_once(200, r#"{"candidates":[{"content":{"parts":[{"text":"4"}]}}]}"#).await;
    let mut app = App::new(client_for(&stub.base_url));

    assert_eq!(app.ask("2+2?").await.unwrap(), "4");
    assert_eq!(app.session.transcript().len(), 2);
}

#[tokio::test]
async fn test_ask_reports_failure_as_reply_text() {
    let mut app = App::new(client_for(&dead_base_url().await));
    assert_eq!(app.ask("hello").await.unwrap(), ERROR_OCCURRED);
}

#[tokio::test]
async fn test_ask_rejects_blank_message() {
    let mut app = App::new(client_for(&dead_base_url().await));

    let err = app.ask("   ").await.unwrap_err();
    assert!(err.to_string().contains("empty"));
    assert!(app.session.transcript().is_empty());
}
