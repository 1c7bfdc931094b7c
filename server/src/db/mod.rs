//! データベースアクセス層
//!
//! ユーザー（認証情報）とフィーチャーフラグの永続化。
//! バックエンドは `StorageBackend` 設定で明示的に選択する。

/// ユーザー管理（SQLite）
pub mod users;

/// フィーチャーフラグ管理（SQLite）
pub mod flags;

/// インメモリ実装
pub mod memory;

/// データベースマイグレーション
pub mod migrations;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flag_service_common::{
    auth::User,
    config::StorageBackend,
    error::{StoreError, StoreResult},
    types::{FeatureFlag, FeatureFlagUpdate, NewFeatureFlag},
};
use std::sync::Arc;

/// 認証情報ストア
///
/// 削除されていないユーザーの中でユーザー名の一意性を保証する。
/// 一意性はアプリケーション側のロックではなくストアの制約で担保すること。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// ユーザーを作成
    ///
    /// # Returns
    /// * `Err(StoreError::Conflict)` - ユーザー名が既に存在する
    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User>;

    /// ユーザー名で削除されていないユーザーを検索
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
}

/// フィーチャーフラグストア
///
/// 削除されていないフラグの中でフラグ名の一意性を保証する
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// フラグを作成
    ///
    /// # Returns
    /// * `Err(StoreError::Conflict)` - フラグ名が既に存在する
    async fn create(&self, flag: &NewFeatureFlag) -> StoreResult<FeatureFlag>;

    /// 削除されていないフラグをID順に取得
    async fn list(&self) -> StoreResult<Vec<FeatureFlag>>;

    /// IDでフラグを取得
    async fn get(&self, id: i64) -> StoreResult<Option<FeatureFlag>>;

    /// フラグを部分更新
    ///
    /// # Returns
    /// * `Ok(None)` - フラグが存在しない
    /// * `Err(StoreError::Conflict)` - 新しいフラグ名が既に存在する
    async fn update(&self, id: i64, update: &FeatureFlagUpdate) -> StoreResult<Option<FeatureFlag>>;

    /// フラグを論理削除（存在しない場合も成功）
    async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// 選択されたバックエンドのストア一式
#[derive(Clone)]
pub struct Stores {
    /// 認証情報ストア
    pub users: Arc<dyn UserStore>,
    /// フィーチャーフラグストア
    pub flags: Arc<dyn FlagStore>,
}

impl Stores {
    /// SQLite接続プールからストアを作成
    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        Self {
            users: Arc::new(users::SqliteUserStore::new(pool.clone())),
            flags: Arc::new(flags::SqliteFlagStore::new(pool)),
        }
    }

    /// インメモリストアを作成
    pub fn memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserStore::new()),
            flags: Arc::new(memory::MemoryFlagStore::new()),
        }
    }
}

/// 設定に従ってストアを初期化
///
/// SQLiteの場合はデータベース作成とマイグレーションまで行う
pub async fn connect(backend: &StorageBackend) -> StoreResult<Stores> {
    match backend {
        StorageBackend::Sqlite { database_url } => {
            let pool = migrations::initialize_database(database_url).await?;
            Ok(Stores::sqlite(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Stores::memory())
        }
    }
}

/// sqlxエラーを一意制約違反とそれ以外に振り分ける
pub(crate) fn map_sqlx_error(
    err: sqlx::Error,
    context: &str,
    conflict: impl FnOnce() -> String,
) -> StoreError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => StoreError::Conflict(conflict()),
        _ => StoreError::Database(format!("{}: {}", context, err)),
    }
}

/// RFC3339文字列をUTC日時に変換
pub(crate) fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Database(format!("Invalid timestamp '{}': {}", value, e)))
}
