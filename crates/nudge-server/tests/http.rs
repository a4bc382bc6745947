//! Loopback test of the full HTTP surface: poke, match, chat.

use std::net::SocketAddr;
use std::sync::Arc;

use nudge_api::{AppState, AppStateInner};
use nudge_db::Database;
use nudge_engine::Engine;

async fn spawn_server() -> SocketAddr {
    let db = Database::open_in_memory().unwrap();
    let engine = Arc::new(Engine::new(Arc::new(db)));
    let state: AppState = Arc::new(AppStateInner { engine });
    let app = nudge_api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn poke_match_and_chat_over_http() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    // alice pokes bob: pending, no conversation yet
    let res = client
        .post(format!("{base}/pokes"))
        .json(&serde_json::json!({ "from_user_id": "alice", "to_user_id": "bob" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["poke"]["status"], "pending");
    assert!(body.get("conversation").is_none());

    // bob sees the incoming poke
    let body: serde_json::Value = client
        .get(format!("{base}/pokes/incoming"))
        .query(&[("user_id", "bob")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["pokes"].as_array().unwrap().len(), 1);

    // bob pokes back: match, conversation created, bob's turn
    let body: serde_json::Value = client
        .post(format!("{base}/pokes"))
        .json(&serde_json::json!({ "from_user_id": "bob", "to_user_id": "alice" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let conversation = &body["conversation"];
    let conversation_id = conversation["id"].as_str().unwrap().to_string();
    let first = conversation["turn"].as_str().unwrap().to_string();
    let second = if first == "alice" { "bob" } else { "alice" };

    // the non-holder is rejected with 403
    let res = client
        .post(format!("{base}/conversations/{conversation_id}/messages"))
        .json(&serde_json::json!({ "sender_id": second, "content": "me first" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    // the turn holder sends; over-long content is rejected with 400
    let res = client
        .post(format!("{base}/conversations/{conversation_id}/messages"))
        .json(&serde_json::json!({ "sender_id": first, "content": "x".repeat(101) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(format!("{base}/conversations/{conversation_id}/messages"))
        .json(&serde_json::json!({ "sender_id": first, "content": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    // turn has flipped
    let body: serde_json::Value = client
        .get(format!("{base}/conversations/{conversation_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["turn"], second);

    let res = client
        .post(format!("{base}/conversations/{conversation_id}/messages"))
        .json(&serde_json::json!({ "sender_id": second, "content": "hey" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let body: serde_json::Value = client
        .get(format!("{base}/conversations/{conversation_id}/messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "hi");
    assert_eq!(messages[1]["content"], "hey");

    // both users see exactly one conversation
    let body: serde_json::Value = client
        .get(format!("{base}/conversations"))
        .query(&[("user_id", "alice")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["conversations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn self_poke_and_unknown_conversation_are_client_errors() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/pokes"))
        .json(&serde_json::json!({ "from_user_id": "alice", "to_user_id": "alice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .get(format!(
            "{base}/conversations/00000000-0000-0000-0000-000000000000/messages"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
