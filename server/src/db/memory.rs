//! インメモリストア
//!
//! 一意性チェックと挿入を同一の書き込みロック内で行うため、
//! 同名の同時登録が両方成功することはない。

use super::{FlagStore, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use flag_service_common::auth::User;
use flag_service_common::error::{StoreError, StoreResult};
use flag_service_common::types::{FeatureFlag, FeatureFlagUpdate, NewFeatureFlag};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// インメモリ認証情報ストア
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.is_active() && u.username == username) {
            return Err(StoreError::Conflict(format!(
                "Username '{}' already exists",
                username
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.is_active() && u.username == username)
            .cloned())
    }
}

#[derive(Default)]
struct FlagTable {
    next_id: i64,
    rows: BTreeMap<i64, FeatureFlag>,
}

impl FlagTable {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|f| f.deleted_at.is_none() && f.name == name && Some(f.id) != except)
    }

    fn live(&self, id: i64) -> Option<&FeatureFlag> {
        self.rows.get(&id).filter(|f| f.deleted_at.is_none())
    }
}

/// インメモリフィーチャーフラグストア
#[derive(Default)]
pub struct MemoryFlagStore {
    table: RwLock<FlagTable>,
}

impl MemoryFlagStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn create(&self, flag: &NewFeatureFlag) -> StoreResult<FeatureFlag> {
        let mut table = self.table.write().await;

        if table.name_taken(&flag.name, None) {
            return Err(StoreError::Conflict(format!(
                "Feature flag '{}' already exists",
                flag.name
            )));
        }

        table.next_id += 1;
        let now = Utc::now();
        let created = FeatureFlag {
            id: table.next_id,
            name: flag.name.clone(),
            description: flag.description.clone(),
            is_enabled: flag.is_enabled,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn list(&self) -> StoreResult<Vec<FeatureFlag>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|f| f.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<FeatureFlag>> {
        let table = self.table.read().await;
        Ok(table.live(id).cloned())
    }

    async fn update(&self, id: i64, update: &FeatureFlagUpdate) -> StoreResult<Option<FeatureFlag>> {
        let mut table = self.table.write().await;

        let Some(current) = table.live(id) else {
            return Ok(None);
        };
        let mut updated = current.merged(update);

        if table.name_taken(&updated.name, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "Feature flag '{}' already exists",
                updated.name
            )));
        }

        updated.updated_at = Utc::now();
        table.rows.insert(id, updated.clone());

        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut table = self.table.write().await;
        if let Some(flag) = table.rows.get_mut(&id) {
            if flag.deleted_at.is_none() {
                flag.deleted_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}
