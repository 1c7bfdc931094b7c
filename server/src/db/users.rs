// ユーザー（認証情報）のCRUD操作

use super::{map_sqlx_error, parse_timestamp, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use flag_service_common::auth::User;
use flag_service_common::error::{StoreError, StoreResult};
use sqlx::SqlitePool;
use uuid::Uuid;

/// SQLiteによる認証情報ストア
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// 接続プールからストアを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    /// ユーザーを作成
    ///
    /// # Arguments
    /// * `username` - ユーザー名
    /// * `password_hash` - bcryptハッシュ化されたパスワード
    ///
    /// # Returns
    /// * `Ok(User)` - 作成されたユーザー
    /// * `Err(StoreError::Conflict)` - ユーザー名重複（一意インデックス違反）
    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, NULL)",
        )
        .bind(id.to_string())
        .bind(username)
        .bind(password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_error(e, "Failed to create user", || {
                format!("Username '{}' already exists", username)
            })
        })?;

        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// ユーザー名で削除されていないユーザーを検索
    ///
    /// # Returns
    /// * `Ok(Some(User))` - ユーザーが見つかった
    /// * `Ok(None)` - ユーザーが見つからなかった
    /// * `Err(StoreError)` - 検索失敗
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at, updated_at, deleted_at
             FROM users WHERE username = ? AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to find user: {}", e)))?;

        row.map(UserRow::into_user).transpose()
    }
}

// SQLiteからの行取得用の内部型
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Database(format!("Invalid user id '{}': {}", self.id, e)))?;
        let deleted_at = self.deleted_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at,
        })
    }
}
