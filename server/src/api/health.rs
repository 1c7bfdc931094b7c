//! ヘルスチェックAPI

use axum::Json;
use serde_json::{json, Value};

/// GET /health - 稼働確認（認証不要）
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
