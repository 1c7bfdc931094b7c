//! REST APIハンドラー
//!
//! 登録・ログイン（認証不要）とフィーチャーフラグ管理（JWT認証必須）

pub mod auth;
pub mod flags;
pub mod health;

use crate::AppState;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use flag_service_common::error::AuthError;
use serde::Serialize;

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// エラーメッセージ
    pub error: String,
}

/// メッセージレスポンス
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// メッセージ
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    // JWT認証が必要な保護されたルート
    let protected_routes = Router::new()
        .route("/api/flags", get(flags::list_flags).post(flags::create_flag))
        .route(
            "/api/flags/:id",
            get(flags::get_flag)
                .put(flags::update_flag)
                .delete(flags::delete_flag),
        )
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    Router::new()
        // 認証エンドポイント（認証不要）
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/health", get(health::health))
        // 保護されたルート
        .merge(protected_routes)
        .with_state(state)
}

/// `{"error": message}` 形式のレスポンスを作成
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// 認証エラーをHTTPレスポンスに変換
///
/// 内部エラーの詳細はログにのみ出力する
pub(crate) fn auth_error_response(err: AuthError) -> Response {
    match err {
        AuthError::Validation(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
        AuthError::Conflict => error_response(StatusCode::CONFLICT, "Username already taken"),
        AuthError::Unauthorized => {
            error_response(StatusCode::UNAUTHORIZED, "Invalid username or password")
        }
        AuthError::Internal(msg) => {
            tracing::error!("Authentication failed internally: {}", msg);
            internal_error()
        }
    }
}

/// JSONボディの解析失敗を 400 Bad Request に変換
pub(crate) fn json_rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

/// パスパラメータの解析失敗を 400 Bad Request に変換
pub(crate) fn path_rejection_response(rejection: PathRejection) -> Response {
    tracing::debug!("Rejected path parameter: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, "Invalid feature flag id")
}

pub(crate) fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
