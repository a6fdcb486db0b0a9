use super::*;
use crate::test_support::{json_response, ok, ScriptedTransport};
use reqwest::{Method, StatusCode};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn initial_load_failures_stay_on_their_own_panel() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.once(
        Method::GET,
        "/api/tickets?status=OPEN",
        ok(json!({"tickets": [{"id": 1, "title": "Login", "assignee": "Alice", "status": "OPEN"}]})),
    );
    transport.once(
        Method::GET,
        "/api/users",
        json_response(StatusCode::SERVICE_UNAVAILABLE, json!({})),
    );
    let client = MiniJiraClient::with_transport(transport);
    let mut events = client.subscribe_events();

    client.load_initial().await;

    assert_eq!(client.tickets().tickets().await.len(), 1);
    assert_eq!(client.tickets().gateway().last_error(), None);
    assert!(client.users().users().await.is_empty());
    assert_eq!(
        client.users().gateway().last_error().as_deref(),
        Some("503 Service Unavailable")
    );
    assert_eq!(client.chat().gateway().status(), RequestStatus::default());

    let mut failures = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::RequestFailed { panel, .. } = event {
            failures.push(panel);
        }
    }
    assert_eq!(failures, vec![Panel::Users]);
}

#[tokio::test]
async fn pending_ticket_call_does_not_block_other_panels() {
    let transport = Arc::new(ScriptedTransport::new());
    let release = transport.gate(Method::GET, "/api/tickets?status=OPEN");
    transport.once(
        Method::GET,
        "/api/users",
        ok(json!({"users": [{"user_id": 1, "name": "Alice"}]})),
    );
    transport.once(Method::POST, "/api/chat", ok(json!({"reply": "done"})));
    let client = MiniJiraClient::with_transport(Arc::clone(&transport) as Arc<dyn Transport>);

    let pending = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.tickets().reload().await }
    });
    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.count(&Method::GET, "/api/tickets?status=OPEN") < 1 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("ticket reload issued");

    client.users().reload().await.expect("users");
    client.chat().send("hello").await.expect("chat");
    assert!(client.tickets().gateway().in_flight());
    assert!(!client.users().gateway().in_flight());
    assert_eq!(client.chat().transcript().await.len(), 3);

    release.send(ok(json!({"tickets": []}))).expect("release");
    tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("reload finished")
        .expect("join")
        .expect("reload");
    assert!(!client.tickets().gateway().in_flight());
}

#[tokio::test]
async fn reset_does_not_touch_chat_transcript() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.once(Method::POST, "/api/chat", ok(json!({"reply": "hi"})));
    transport.once(Method::POST, "/api/reset", ok(json!({"ok": true})));
    transport.once(Method::GET, "/api/tickets?status=OPEN", ok(json!({"tickets": []})));
    let client = MiniJiraClient::with_transport(transport);

    client.chat().send("hello").await.expect("chat");
    client.tickets().reset_all().await.expect("reset");

    assert_eq!(client.chat().transcript().await.len(), 3);
}
