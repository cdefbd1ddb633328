//! REST API integration tests
//!
//! These tests require:
//! - Running PostgreSQL (schema.sql applied)
//! - Running Redis
//! - Environment variables: DATABASE_URL, REDIS_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::fixtures::*;
use integration_tests::helpers::{assert_error, assert_json};
use integration_tests::{check_test_env, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get("/health/ready").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_signup_returns_token_pair() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let signup = SignupRequest::unique();

    let response = server.post("/api/v1/auth/signup", &signup).await.unwrap();
    let auth: AuthData = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.username, signup.username);
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 900);
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_signup_duplicate_username_conflicts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let signup = SignupRequest::unique();

    let response = server.post("/api/v1/auth/signup", &signup).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut duplicate = signup.clone();
    duplicate.email = format!("other.{}", signup.email);
    let response = server.post("/api/v1/auth/signup", &duplicate).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "CONFLICT")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_with_username_and_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (signup, _) = server.signup_user().await.unwrap();

    // By username
    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_signup(&signup))
        .await
        .unwrap();
    let auth: AuthData = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.username, signup.username);

    // By email
    let response = server
        .post(
            "/api/v1/auth/login",
            &LoginRequest {
                login: signup.email.clone(),
                password: signup.password.clone(),
            },
        )
        .await
        .unwrap();
    let auth: AuthData = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.email, signup.email);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (signup, _) = server.signup_user().await.unwrap();

    // Wrong password and unknown user produce the identical error
    let response = server
        .post(
            "/api/v1/auth/login",
            &LoginRequest {
                login: signup.username.clone(),
                password: "WrongPass123".to_string(),
            },
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "AUTH_INVALID")
        .await
        .unwrap();

    let response = server
        .post(
            "/api/v1/auth/login",
            &LoginRequest {
                login: "no_such_user_anywhere".to_string(),
                password: "WrongPass123".to_string(),
            },
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "AUTH_INVALID")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_signup_then_session_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, auth) = server.signup_user().await.unwrap();

    let response = server
        .get_auth("/api/v1/auth/session", &auth.access_token)
        .await
        .unwrap();
    let session: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(session["valid"], true);
    assert_eq!(
        session["user"]["user_id"].as_str().unwrap(),
        auth.user.user_id.to_string()
    );
}

#[tokio::test]
async fn test_refresh_rotation_is_single_use() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, auth) = server.signup_user().await.unwrap();

    // First rotation succeeds
    let response = server
        .post(
            "/api/v1/auth/refresh",
            &json!({"refresh_token": auth.refresh_token}),
        )
        .await
        .unwrap();
    let rotated: AuthData = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // Replaying the consumed token fails
    let response = server
        .post(
            "/api/v1/auth/refresh",
            &json!({"refresh_token": auth.refresh_token}),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "AUTH_INVALID")
        .await
        .unwrap();

    // The rotated token works
    let response = server
        .post(
            "/api/v1/auth/refresh",
            &json!({"refresh_token": rotated.refresh_token}),
        )
        .await
        .unwrap();
    let _: AuthData = assert_json(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, auth) = server.signup_user().await.unwrap();

    for _ in 0..2 {
        let response = server
            .post(
                "/api/v1/auth/logout",
                &json!({"refresh_token": auth.refresh_token}),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // The revoked token cannot be rotated
    let response = server
        .post(
            "/api/v1/auth/refresh",
            &json!({"refresh_token": auth.refresh_token}),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "AUTH_INVALID")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_request_is_silent_on_unknown_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server
        .post(
            "/api/v1/auth/reset/request",
            &json!({"email": "nobody@example.com"}),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_confirm_reset_with_bogus_token_fails() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server
        .post(
            "/api/v1/auth/reset/confirm",
            &json!({"token": "deadbeef", "new_password": "NewPass123"}),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "AUTH_INVALID")
        .await
        .unwrap();
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_lookup_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (signup, auth) = server.signup_user().await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/users/lookup/{}", signup.username),
            &auth.access_token,
        )
        .await
        .unwrap();
    let found: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        found["user_id"].as_str().unwrap(),
        auth.user.user_id.to_string()
    );

    let response = server
        .get_auth("/api/v1/users/lookup/ghost_user_404", &auth.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_endpoints_require_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/conversations").await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Conversations
// ============================================================================

#[tokio::test]
async fn test_conversation_pagination_envelope() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/conversation/{}?limit=10&offset=0", bob.user.user_id),
            &alice.access_token,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["page_size"], 10);
    assert!(body.get("timestamp").is_some());
}

#[tokio::test]
async fn test_conversation_rejects_bad_limit() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();

    for bad in ["0", "101"] {
        let response = server
            .get_auth(
                &format!(
                    "/api/v1/conversation/{}?limit={bad}",
                    bob.user.user_id
                ),
                &alice.access_token,
            )
            .await
            .unwrap();
        assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            .await
            .unwrap();
    }
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_group_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.signup_user().await.unwrap();
    let (_, bob) = server.signup_user().await.unwrap();
    let (_, carol) = server.signup_user().await.unwrap();

    // Alice creates a group with Bob
    let response = server
        .post_auth(
            "/api/v1/groups",
            &alice.access_token,
            &json!({"name": "lunch crew", "member_ids": [bob.user.user_id]}),
        )
        .await
        .unwrap();
    let group: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let group_id = group["group_id"].as_str().unwrap().to_string();

    // Both see it in their group lists; Alice is admin
    let response = server
        .get_auth("/api/v1/groups/my", &alice.access_token)
        .await
        .unwrap();
    let groups: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let mine = groups
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["group_id"] == group_id.as_str())
        .expect("group missing from creator's list");
    assert_eq!(mine["role"], "admin");
    assert_eq!(mine["member_count"], 2);

    // Bob (not an admin) cannot add members
    let response = server
        .post_auth(
            &format!("/api/v1/groups/{group_id}/members"),
            &bob.access_token,
            &json!({"member_ids": [carol.user.user_id]}),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN")
        .await
        .unwrap();

    // Alice can
    let response = server
        .post_auth(
            &format!("/api/v1/groups/{group_id}/members"),
            &alice.access_token,
            &json!({"member_ids": [carol.user.user_id]}),
        )
        .await
        .unwrap();
    let added: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(added["added"], 1);

    // Carol is a member and can read the (empty) history
    let response = server
        .get_auth(
            &format!("/api/v1/groups/{group_id}/messages"),
            &carol.access_token,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Carol (not an admin) cannot remove another member
    let response = server
        .delete_auth(
            &format!("/api/v1/groups/{group_id}/members/{}", bob.user.user_id),
            &carol.access_token,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN")
        .await
        .unwrap();

    // But members can remove themselves
    let response = server
        .delete_auth(
            &format!("/api/v1/groups/{group_id}/members/{}", bob.user.user_id),
            &bob.access_token,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Having left, Bob can no longer read the history
    let response = server
        .get_auth(
            &format!("/api/v1/groups/{group_id}/messages"),
            &bob.access_token,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_GROUP_MEMBER")
        .await
        .unwrap();

    // A stranger cannot
    let (_, dave) = server.signup_user().await.unwrap();
    let response = server
        .get_auth(
            &format!("/api/v1/groups/{group_id}/messages"),
            &dave.access_token,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_GROUP_MEMBER")
        .await
        .unwrap();
}
