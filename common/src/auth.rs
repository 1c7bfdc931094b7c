//! 認証関連のデータモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ユーザー
///
/// `password_hash` はレスポンスに含めない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 一意識別子（作成後は不変）
    pub id: Uuid,
    /// ユーザー名（大文字小文字を区別）
    pub username: String,
    /// bcryptハッシュ
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 更新日時
    pub updated_at: DateTime<Utc>,
    /// 論理削除日時
    #[serde(default, skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// 論理削除されていないか
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// JWTクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザー名
    pub sub: String,
    /// 発行日時（Unix timestamp）
    pub iat: i64,
    /// 有効期限（Unix timestamp）
    pub exp: i64,
}
