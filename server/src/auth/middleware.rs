// 認証ミドルウェア実装

use super::gateway::AuthGateway;
use crate::api::error_response;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// JWT認証ミドルウェア
///
/// Authorizationヘッダーから "Bearer {token}" を抽出してJWT検証を行う。
/// 失敗理由（ヘッダー欠落、形式不正、トークン不正）はログにのみ残し、
/// レスポンスは一律 401 Unauthorized とする。
///
/// # Arguments
/// * `State(gateway)` - 認証ゲートウェイ
/// * `request` - HTTPリクエスト
/// * `next` - 次のミドルウェア/ハンドラー
///
/// # Returns
/// * `Ok(Response)` - 認証成功、requestにClaimsを追加
/// * `Err(Response)` - 認証失敗、401 Unauthorized（ハンドラーは実行しない）
pub async fn jwt_auth_middleware(
    State(gateway): State<AuthGateway>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    // Authorizationヘッダーを取得
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            unauthorized()
        })?;

    // "Bearer {token}" から token を抽出
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("Invalid Authorization header format");
        unauthorized()
    })?;

    // JWTを検証
    let claims = gateway.authorize(token.trim()).map_err(|_| unauthorized())?;

    // 検証済みのClaimsをrequestの拡張データに格納
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}
