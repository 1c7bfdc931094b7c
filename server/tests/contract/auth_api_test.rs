//! 認証API契約テスト
//!
//! POST /register, POST /login

use crate::support::{app, http};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

#[tokio::test]
async fn test_register_contract() {
    let app = app::build_sqlite_app().await;

    let (status, body) = http::register(&app, "alice", "pw1").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    // パスワードやハッシュはレスポンスに含まれない
    let raw = body.to_string();
    assert!(!raw.contains("pw1"));
    assert!(!raw.contains("$2b$"));
}

#[tokio::test]
async fn test_register_duplicate_username_returns_conflict() {
    let app = app::build_sqlite_app().await;

    let (status, _) = http::register(&app, "alice", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = http::register(&app, "alice", "other").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_usernames_are_case_sensitive() {
    let app = app::build_memory_app().await;

    let (status, _) = http::register(&app, "alice", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = http::register(&app, "Alice", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = app::build_memory_app().await;

    let cases = [
        json!({ "username": "", "password": "pw1" }),
        json!({ "username": "alice", "password": "" }),
        json!({ "username": "alice", "password": "x".repeat(73) }),
        json!({ "username": "alice" }),
    ];

    for case in cases {
        let (status, body) = http::send(&app, "POST", "/register", None, Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", case);
        assert!(body["error"].is_string(), "payload: {}", case);
    }
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let app = app::build_memory_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = http::send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_login_contract() {
    let app = app::build_sqlite_app().await;
    http::register(&app, "alice", "pw1").await;

    let (status, body) = http::login(&app, "alice", "pw1").await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token must be a string");
    assert_eq!(token.split('.').count(), 3, "token must be a compact JWT");
    assert_eq!(body["expires_in"], 86400);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app::build_sqlite_app().await;
    http::register(&app, "alice", "pw1").await;

    let (wrong_status, wrong_body) = http::login(&app, "alice", "wrong").await;
    let (unknown_status, unknown_body) = http::login(&app, "mallory", "pw1").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_rejects_password_beyond_72_bytes() {
    let app = app::build_sqlite_app().await;
    let password = "a".repeat(72);
    let (status, _) = http::register(&app, "alice", &password).await;
    assert_eq!(status, StatusCode::CREATED);

    // 先頭72バイトが同じでも別のパスワードではログインできない
    let longer = format!("{}DIFFERENT-SUFFIX", password);
    let (status, body) = http::login(&app, "alice", &longer).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());

    let (status, _) = http::login(&app, "alice", &password).await;
    assert_eq!(status, StatusCode::OK);
}
