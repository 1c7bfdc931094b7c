//! フィーチャーフラグ管理API
//!
//! すべてJWT認証ミドルウェアの内側で実行される。
//! 認証済みユーザーは全員同じ権限を持つ（ユーザー単位のスコープなし）。

use super::{
    error_response, internal_error, json_rejection_response, path_rejection_response,
    MessageResponse,
};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use flag_service_common::auth::Claims;
use flag_service_common::error::StoreError;
use flag_service_common::types::{FeatureFlag, FeatureFlagUpdate, NewFeatureFlag};

const NOT_FOUND_MESSAGE: &str = "Feature flag not found";

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::Conflict(msg) => error_response(StatusCode::CONFLICT, &msg),
        StoreError::Database(msg) => {
            tracing::error!("Feature flag store failed: {}", msg);
            internal_error()
        }
    }
}

#[allow(clippy::result_large_err)]
fn validate_name(name: &str) -> Result<(), Response> {
    if name.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "name is required"));
    }
    Ok(())
}

/// POST /api/flags - フラグ作成
///
/// # Returns
/// * `201 Created` - 作成されたフラグ
/// * `400 Bad Request` - ボディ不正、名前が空
/// * `409 Conflict` - 名前が使用済み
pub async fn create_flag(
    Extension(claims): Extension<Claims>,
    State(app_state): State<AppState>,
    payload: Result<Json<NewFeatureFlag>, JsonRejection>,
) -> Result<(StatusCode, Json<FeatureFlag>), Response> {
    let Json(request) = payload.map_err(json_rejection_response)?;
    validate_name(&request.name)?;

    let flag = app_state
        .flags
        .create(&request)
        .await
        .map_err(store_error_response)?;

    tracing::info!(subject = %claims.sub, flag_id = flag.id, name = %flag.name, "Feature flag created");
    Ok((StatusCode::CREATED, Json(flag)))
}

/// GET /api/flags - フラグ一覧取得
pub async fn list_flags(State(app_state): State<AppState>) -> Result<Json<Vec<FeatureFlag>>, Response> {
    let flags = app_state.flags.list().await.map_err(store_error_response)?;
    Ok(Json(flags))
}

/// GET /api/flags/:id - フラグ取得
///
/// # Returns
/// * `200 OK` - フラグ
/// * `400 Bad Request` - IDが数値でない
/// * `404 Not Found` - 存在しない、または削除済み
pub async fn get_flag(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<FeatureFlag>, Response> {
    let Path(id) = id.map_err(path_rejection_response)?;

    app_state
        .flags
        .get(id)
        .await
        .map_err(store_error_response)?
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE))
}

/// PUT /api/flags/:id - フラグ更新
///
/// 指定されたフィールドのみ更新する
///
/// # Returns
/// * `200 OK` - 更新されたフラグ
/// * `400 Bad Request` - IDが数値でない、ボディ不正、名前が空
/// * `404 Not Found` - 存在しない、または削除済み
/// * `409 Conflict` - 名前が使用済み
pub async fn update_flag(
    Extension(claims): Extension<Claims>,
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<FeatureFlagUpdate>, JsonRejection>,
) -> Result<Json<FeatureFlag>, Response> {
    let Path(id) = id.map_err(path_rejection_response)?;
    let Json(request) = payload.map_err(json_rejection_response)?;
    if let Some(ref name) = request.name {
        validate_name(name)?;
    }

    let flag = app_state
        .flags
        .update(id, &request)
        .await
        .map_err(store_error_response)?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE))?;

    tracing::info!(subject = %claims.sub, flag_id = flag.id, "Feature flag updated");
    Ok(Json(flag))
}

/// DELETE /api/flags/:id - フラグ削除（論理削除）
///
/// 存在しないIDでも 200 OK を返す（IDが数値でない場合は 400）
pub async fn delete_flag(
    Extension(claims): Extension<Claims>,
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, Response> {
    let Path(id) = id.map_err(path_rejection_response)?;

    app_state
        .flags
        .delete(id)
        .await
        .map_err(store_error_response)?;

    tracing::info!(subject = %claims.sub, flag_id = id, "Feature flag deleted");
    Ok(Json(MessageResponse::new(
        "Feature flag deleted successfully",
    )))
}
