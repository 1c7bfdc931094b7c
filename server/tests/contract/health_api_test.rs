//! GET /health の契約テスト

use crate::support::{app, http};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_requires_no_token() {
    let app = app::build_memory_app().await;

    let (status, body) = http::send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
