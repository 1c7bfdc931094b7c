//! フィーチャーフラグAPI契約テスト
//!
//! /api/flags は全エンドポイントでBearerトークンが必要

use crate::support::{app, http};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

#[tokio::test]
async fn test_flags_require_bearer_token() {
    let app = app::build_memory_app().await;

    let endpoints = [
        ("GET", "/api/flags"),
        ("POST", "/api/flags"),
        ("GET", "/api/flags/1"),
        ("PUT", "/api/flags/1"),
        ("DELETE", "/api/flags/1"),
    ];

    for (method, uri) in endpoints {
        let (status, body) = http::send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "Unauthorized");
    }
}

#[tokio::test]
async fn test_flags_reject_non_bearer_scheme() {
    let app = app::build_memory_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/flags")
        .header("authorization", format!("Basic {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = http::send_request(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = http::send(&app, "GET", "/api/flags", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_flag_contract() {
    let app = app::build_sqlite_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    let (status, body) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "dark-mode", "description": "Dark theme", "is_enabled": true })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert_eq!(body["name"], "dark-mode");
    assert_eq!(body["description"], "Dark theme");
    assert_eq!(body["is_enabled"], true);
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
    assert!(body.get("deleted_at").is_none());
}

#[tokio::test]
async fn test_create_flag_defaults_and_validation() {
    let app = app::build_memory_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    let (status, body) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "beta" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_enabled"], false);

    let (status, _) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "beta" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_update_delete_contract() {
    let app = app::build_sqlite_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    let (_, created) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "search-v2" })),
    )
    .await;
    let uri = format!("/api/flags/{}", created["id"]);

    let (status, fetched) = http::send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "search-v2");

    // 指定したフィールドのみ更新される
    let (status, updated) = http::send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "is_enabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_enabled"], true);
    assert_eq!(updated["name"], "search-v2");

    let (status, body) = http::send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feature flag deleted successfully");

    let (status, body) = http::send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Feature flag not found");

    let (status, _) = http::send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "is_enabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 存在しないフラグの削除も成功する
    let (status, _) = http::send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_flag_name_can_be_reused() {
    let app = app::build_sqlite_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    let (_, first) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "promo" })),
    )
    .await;
    let uri = format!("/api/flags/{}", first["id"]);
    http::send(&app, "DELETE", &uri, Some(&token), None).await;

    let (status, second) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "promo" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(first["id"], second["id"]);

    let (status, list) = http::send(&app, "GET", "/api/flags", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_numeric_id_returns_json_error() {
    let app = app::build_memory_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    for method in ["GET", "DELETE"] {
        let (status, body) = http::send(&app, method, "/api/flags/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", method);
        assert_eq!(body["error"], "Invalid feature flag id");
    }

    let (status, body) = http::send(
        &app,
        "PUT",
        "/api/flags/abc",
        Some(&token),
        Some(json!({ "is_enabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid feature flag id");
}
