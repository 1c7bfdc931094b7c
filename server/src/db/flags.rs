// フィーチャーフラグのCRUD操作（論理削除）

use super::{map_sqlx_error, parse_timestamp, FlagStore};
use async_trait::async_trait;
use chrono::Utc;
use flag_service_common::error::{StoreError, StoreResult};
use flag_service_common::types::{FeatureFlag, FeatureFlagUpdate, NewFeatureFlag};
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, is_enabled, created_at, updated_at, deleted_at FROM feature_flags";

/// SQLiteによるフィーチャーフラグストア
#[derive(Clone)]
pub struct SqliteFlagStore {
    pool: SqlitePool,
}

impl SqliteFlagStore {
    /// 接続プールからストアを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlagStore for SqliteFlagStore {
    async fn create(&self, flag: &NewFeatureFlag) -> StoreResult<FeatureFlag> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO feature_flags (name, description, is_enabled, created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, NULL)",
        )
        .bind(&flag.name)
        .bind(&flag.description)
        .bind(flag.is_enabled)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_error(e, "Failed to create feature flag", || {
                format!("Feature flag '{}' already exists", flag.name)
            })
        })?;

        Ok(FeatureFlag {
            id: result.last_insert_rowid(),
            name: flag.name.clone(),
            description: flag.description.clone(),
            is_enabled: flag.is_enabled,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    async fn list(&self) -> StoreResult<Vec<FeatureFlag>> {
        let rows = sqlx::query_as::<_, FlagRow>(&format!(
            "{} WHERE deleted_at IS NULL ORDER BY id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to list feature flags: {}", e)))?;

        rows.into_iter().map(FlagRow::into_flag).collect()
    }

    async fn get(&self, id: i64) -> StoreResult<Option<FeatureFlag>> {
        let row = sqlx::query_as::<_, FlagRow>(&format!(
            "{} WHERE id = ? AND deleted_at IS NULL",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to find feature flag: {}", e)))?;

        row.map(FlagRow::into_flag).transpose()
    }

    async fn update(&self, id: i64, update: &FeatureFlagUpdate) -> StoreResult<Option<FeatureFlag>> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };

        let mut updated = current.merged(update);
        updated.updated_at = Utc::now();

        let result = sqlx::query(
            "UPDATE feature_flags SET name = ?, description = ?, is_enabled = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&updated.name)
        .bind(&updated.description)
        .bind(updated.is_enabled)
        .bind(updated.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_error(e, "Failed to update feature flag", || {
                format!("Feature flag '{}' already exists", updated.name)
            })
        })?;

        // 取得後に別リクエストで削除された場合
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE feature_flags SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to delete feature flag: {}", e)))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct FlagRow {
    id: i64,
    name: String,
    description: String,
    is_enabled: bool,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl FlagRow {
    fn into_flag(self) -> StoreResult<FeatureFlag> {
        let deleted_at = self.deleted_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(FeatureFlag {
            id: self.id,
            name: self.name,
            description: self.description,
            is_enabled: self.is_enabled,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at,
        })
    }
}
