//! Flag Service Server
//!
//! 認証済みクライアント向けのフィーチャーフラグ管理サーバー

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 認証・認可機能
pub mod auth;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// JWT秘密鍵の読み込み
pub mod jwt_secret;

/// ロギング初期化ユーティリティ
pub mod logging;

use flag_service_common::config::AuthConfig;
use flag_service_common::error::CommonError;
use std::sync::Arc;

/// アプリケーション状態
///
/// 依存はすべて明示的に注入され、ライフサイクルはエントリポイントが管理する
#[derive(Clone)]
pub struct AppState {
    /// 認証ゲートウェイ
    pub auth: auth::AuthGateway,
    /// フィーチャーフラグストア
    pub flags: Arc<dyn db::FlagStore>,
}

impl AppState {
    /// ストアと認証設定からアプリケーション状態を作成
    pub fn new(stores: db::Stores, auth_config: &AuthConfig) -> Result<Self, CommonError> {
        let auth = auth::AuthGateway::from_config(stores.users, auth_config)?;
        Ok(Self {
            auth,
            flags: stores.flags,
        })
    }
}
