//! フラグ管理フローE2Eテスト

use crate::support::{app, http};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_complete_flag_lifecycle() {
    let app = app::build_sqlite_app().await;
    let alice = http::register_and_login(&app, "alice", "pw1").await;
    let bob = http::register_and_login(&app, "bob", "pw2").await;

    // Step 1: aliceが作成
    let (status, created) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&alice),
        Some(json!({ "name": "checkout-v2", "description": "New checkout" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/flags/{}", created["id"]);

    // Step 2: bobにも見える（ユーザー単位のスコープなし）
    let (status, list) = http::send(&app, "GET", "/api/flags", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "checkout-v2");

    // Step 3: bobが有効化
    let (status, updated) = http::send(
        &app,
        "PUT",
        &uri,
        Some(&bob),
        Some(json!({ "is_enabled": true, "description": "Rolled out" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_enabled"], true);
    assert_eq!(updated["description"], "Rolled out");
    assert_eq!(updated["created_at"], created["created_at"]);

    // Step 4: aliceが削除
    let (status, _) = http::send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = http::send(&app, "GET", "/api/flags", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_conflict_keeps_original() {
    let app = app::build_memory_app().await;
    let token = http::register_and_login(&app, "alice", "pw1").await;

    let (_, first) = http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "alpha" })),
    )
    .await;
    http::send(
        &app,
        "POST",
        "/api/flags",
        Some(&token),
        Some(json!({ "name": "beta" })),
    )
    .await;

    let uri = format!("/api/flags/{}", first["id"]);
    let (status, _) = http::send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "name": "beta" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, fetched) = http::send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "alpha");
}
