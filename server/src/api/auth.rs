//! 認証API
//!
//! ユーザー登録とログイン

use super::{auth_error_response, json_rejection_response, MessageResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

/// 登録・ログインリクエスト
#[derive(Deserialize)]
pub struct CredentialsRequest {
    /// ユーザー名
    pub username: String,
    /// パスワード
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// JWTトークン
    pub token: String,
    /// トークン有効期限（秒）
    pub expires_in: i64,
}

/// POST /register - ユーザー登録
///
/// # Returns
/// * `201 Created` - 登録成功
/// * `400 Bad Request` - ボディ不正、ユーザー名/パスワードが空
/// * `409 Conflict` - ユーザー名が使用済み
/// * `500 Internal Server Error` - サーバーエラー
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), Response> {
    let Json(request) = payload.map_err(json_rejection_response)?;

    app_state
        .auth
        .register(&request.username, &request.password)
        .await
        .map_err(auth_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /login - ログイン
///
/// ユーザー名とパスワードで認証し、JWTトークンを発行
///
/// # Returns
/// * `200 OK` - ログイン成功（JWT token）
/// * `400 Bad Request` - ボディ不正
/// * `401 Unauthorized` - 認証失敗（未登録ユーザーとパスワード不一致は区別しない）
/// * `500 Internal Server Error` - サーバーエラー
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, Response> {
    let Json(request) = payload.map_err(json_rejection_response)?;

    let issued = app_state
        .auth
        .login(&request.username, &request.password)
        .await
        .map_err(auth_error_response)?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}
