//! WebSocket gateway integration tests
//!
//! End-to-end scenarios over real sockets, PostgreSQL and Redis.
//! Skipped when DATABASE_URL / REDIS_URL are not set.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{check_test_env, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio_tungstenite::connect_async;

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn test_handshake_rejects_invalid_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let result = connect_async(server.ws_url("not-a-token")).await;
    assert!(result.is_err(), "invalid token must not get a socket");
}

#[tokio::test]
async fn test_ping_pong() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();

    let mut ws = server.connect_ws(&alice.access_token).await.unwrap();
    ws.send(json!({"type": "ping"})).await.unwrap();
    let pong = ws.recv_type("pong").await.unwrap();
    assert!(pong.get("timestamp").is_some());
}

#[tokio::test]
async fn test_malformed_and_unknown_frames_keep_connection_open() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let mut ws = server.connect_ws(&alice.access_token).await.unwrap();

    ws.send_raw("{definitely not json").await.unwrap();
    let error = ws.recv_type("error").await.unwrap();
    assert_eq!(error["code"], "PARSE_ERROR");

    ws.send(json!({"type": "message.edit"})).await.unwrap();
    let error = ws.recv_type("error").await.unwrap();
    assert_eq!(error["code"], "INVALID_MESSAGE_TYPE");

    ws.send(json!({"type": "message.send", "content": "hi"}))
        .await
        .unwrap();
    let error = ws.recv_type("error").await.unwrap();
    assert_eq!(error["code"], "MISSING_RECIPIENT");

    // Still alive
    ws.ping().await.unwrap();
}

// ============================================================================
// Scenario 1: online delivery
// ============================================================================

#[tokio::test]
async fn test_online_delivery() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (alice_signup, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();

    let mut alice_ws = server.connect_ws(&alice.access_token).await.unwrap();
    let mut bob_ws = server.connect_ws(&bob.access_token).await.unwrap();
    alice_ws.ping().await.unwrap();
    bob_ws.ping().await.unwrap();

    alice_ws
        .send(json!({
            "type": "message.send",
            "recipient_id": bob.user.user_id,
            "content": "hi"
        }))
        .await
        .unwrap();

    let incoming = bob_ws.recv_type("message.new").await.unwrap();
    assert_eq!(
        incoming["sender_id"].as_str().unwrap(),
        alice.user.user_id.to_string()
    );
    assert_eq!(incoming["sender_username"], alice_signup.username.as_str());
    assert_eq!(incoming["content"], "hi");

    let ack = alice_ws.recv_type("message.ack").await.unwrap();
    assert_eq!(ack["status"], "delivered");
    assert_eq!(ack["message_id"], incoming["message_id"]);

    // The log write is asynchronous on the online path
    tokio::time::sleep(Duration::from_millis(300)).await;
    let response = server
        .get_auth(
            &format!("/api/v1/conversation/{}", bob.user.user_id),
            &alice.access_token,
        )
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    let messages = body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0]["delivered_at"].is_null());
}

// ============================================================================
// Scenario 2: offline enqueue + ordered replay
// ============================================================================

#[tokio::test]
async fn test_offline_enqueue_and_replay() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();

    let mut alice_ws = server.connect_ws(&alice.access_token).await.unwrap();
    alice_ws.ping().await.unwrap();

    for content in ["hi1", "hi2"] {
        alice_ws
            .send(json!({
                "type": "message.send",
                "recipient_id": bob.user.user_id,
                "content": content
            }))
            .await
            .unwrap();
        let ack = alice_ws.recv_type("message.ack").await.unwrap();
        assert_eq!(ack["status"], "queued");
    }

    // Bob connects; his first server frame is the replay batch
    let mut bob_ws = server.connect_ws(&bob.access_token).await.unwrap();
    let batch = bob_ws.recv().await.unwrap();
    assert_eq!(batch["type"], "messages.offline");
    assert_eq!(batch["count"], 2);

    let messages = batch["messages"].as_array().unwrap();
    assert_eq!(messages[0]["content"], "hi1");
    assert_eq!(messages[1]["content"], "hi2");
    assert!(messages.iter().all(|m| m["kind"] == "direct"));

    // Replay marked them delivered; a second connection gets no batch
    bob_ws.close().await.unwrap();
    let mut bob_ws = server.connect_ws(&bob.access_token).await.unwrap();
    bob_ws.ping().await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/conversation/{}", bob.user.user_id),
            &alice.access_token,
        )
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| !m["delivered_at"].is_null()));
}

// ============================================================================
// Scenario 4: group fan-out
// ============================================================================

#[tokio::test]
async fn test_group_fanout_with_offline_member() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();
    let (_, carol) = server.signup_user().await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/groups",
            &alice.access_token,
            &json!({
                "name": "trio",
                "member_ids": [bob.user.user_id, carol.user.user_id]
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let group_id = body["data"]["group_id"].as_str().unwrap().to_string();

    // Alice and Carol online, Bob offline
    let mut alice_ws = server.connect_ws(&alice.access_token).await.unwrap();
    let mut carol_ws = server.connect_ws(&carol.access_token).await.unwrap();
    alice_ws.ping().await.unwrap();
    carol_ws.ping().await.unwrap();

    alice_ws
        .send(json!({
            "type": "message.group.send",
            "group_id": group_id,
            "content": "hello"
        }))
        .await
        .unwrap();

    let incoming = carol_ws.recv_type("message.group.new").await.unwrap();
    assert_eq!(incoming["content"], "hello");
    assert_eq!(incoming["group_id"].as_str().unwrap(), group_id);

    let ack = alice_ws.recv_type("message.ack").await.unwrap();
    assert_eq!(ack["status"], "delivered");

    // Bob's queue holds one group entry, replayed on connect
    let mut bob_ws = server.connect_ws(&bob.access_token).await.unwrap();
    let batch = bob_ws.recv().await.unwrap();
    assert_eq!(batch["type"], "messages.offline");
    assert_eq!(batch["count"], 1);
    let replayed = &batch["messages"][0];
    assert_eq!(replayed["kind"], "group");
    assert_eq!(replayed["message_id"], incoming["message_id"]);
}

#[tokio::test]
async fn test_group_send_requires_membership() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, mallory) = server.signup_user().await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/groups",
            &alice.access_token,
            &json!({"name": "private", "member_ids": []}),
        )
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    let group_id = body["data"]["group_id"].as_str().unwrap().to_string();

    let mut mallory_ws = server.connect_ws(&mallory.access_token).await.unwrap();
    mallory_ws
        .send(json!({
            "type": "message.group.send",
            "group_id": group_id,
            "content": "let me in"
        }))
        .await
        .unwrap();

    let error = mallory_ws.recv_type("error").await.unwrap();
    assert_eq!(error["code"], "NOT_GROUP_MEMBER");
}

// ============================================================================
// Scenario 5: connection cap eviction
// ============================================================================

#[tokio::test]
async fn test_connection_cap_evicts_oldest() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();

    // MAX_CONNECTIONS_PER_USER is 5; open six sockets in sequence
    let mut sockets = Vec::new();
    for _ in 0..6 {
        let mut ws = server.connect_ws(&alice.access_token).await.unwrap();
        ws.ping().await.unwrap();
        sockets.push(ws);
    }

    // Socket #1 was closed by the server with the policy code
    let mut first = sockets.remove(0);
    let code = first.expect_close().await.unwrap();
    assert_eq!(code, 1013);

    // Sockets #2..#6 remain active
    for ws in sockets.iter_mut() {
        ws.ping().await.unwrap();
    }
}

// ============================================================================
// Scenario 6: read receipts
// ============================================================================

#[tokio::test]
async fn test_read_receipt_notifies_sender_once() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();

    let mut alice_ws = server.connect_ws(&alice.access_token).await.unwrap();
    let mut bob_ws = server.connect_ws(&bob.access_token).await.unwrap();
    alice_ws.ping().await.unwrap();
    bob_ws.ping().await.unwrap();

    alice_ws
        .send(json!({
            "type": "message.send",
            "recipient_id": bob.user.user_id,
            "content": "read me"
        }))
        .await
        .unwrap();
    let incoming = bob_ws.recv_type("message.new").await.unwrap();
    let message_id = incoming["message_id"].clone();
    alice_ws.recv_type("message.ack").await.unwrap();

    // Wait for the background persist before acknowledging
    tokio::time::sleep(Duration::from_millis(300)).await;

    bob_ws
        .send(json!({"type": "message.read", "message_id": message_id}))
        .await
        .unwrap();

    let receipt = alice_ws.recv_type("message.read").await.unwrap();
    assert_eq!(receipt["message_id"], message_id);
    assert_eq!(
        receipt["reader_id"].as_str().unwrap(),
        bob.user.user_id.to_string()
    );
    assert!(!receipt["read_at"].is_null());

    // Duplicate receipt produces no second notification: the next frame
    // Alice sees is her own pong
    bob_ws
        .send(json!({"type": "message.read", "message_id": message_id}))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    alice_ws.send(json!({"type": "ping"})).await.unwrap();
    let next = alice_ws.recv().await.unwrap();
    assert_eq!(next["type"], "pong");

    // The log row carries read_at
    let response = server
        .get_auth(
            &format!("/api/v1/conversation/{}", bob.user.user_id),
            &alice.access_token,
        )
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert!(!body["data"][0]["read_at"].is_null());
}

// ============================================================================
// Typing
// ============================================================================

#[tokio::test]
async fn test_typing_forwarded_and_rate_limited() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();

    let mut alice_ws = server.connect_ws(&alice.access_token).await.unwrap();
    let mut bob_ws = server.connect_ws(&bob.access_token).await.unwrap();
    alice_ws.ping().await.unwrap();
    bob_ws.ping().await.unwrap();

    // Burst of three typing events: only the first is forwarded
    for _ in 0..3 {
        alice_ws
            .send(json!({"type": "typing", "recipient_id": bob.user.user_id}))
            .await
            .unwrap();
    }

    let typing = bob_ws.recv_type("typing").await.unwrap();
    assert_eq!(
        typing["user_id"].as_str().unwrap(),
        alice.user.user_id.to_string()
    );

    // Nothing else in Bob's stream but a pong for his own ping
    tokio::time::sleep(Duration::from_millis(200)).await;
    bob_ws.send(json!({"type": "ping"})).await.unwrap();
    let next = bob_ws.recv().await.unwrap();
    assert_eq!(next["type"], "pong");
}

// ============================================================================
// Self-send rejection
// ============================================================================

#[tokio::test]
async fn test_message_to_self_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();

    let mut ws = server.connect_ws(&alice.access_token).await.unwrap();
    ws.send(json!({
        "type": "message.send",
        "recipient_id": alice.user.user_id,
        "content": "hi me"
    }))
    .await
    .unwrap();

    let error = ws.recv_type("error").await.unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");
}
