//! 共通型定義
//!
//! フィーチャーフラグとその作成・更新用の入力型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// フィーチャーフラグ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlag {
    /// 一意識別子（自動採番）
    pub id: i64,
    /// フラグ名（削除されていないフラグの中で一意）
    pub name: String,
    /// 説明
    #[serde(default)]
    pub description: String,
    /// 有効フラグ
    #[serde(default)]
    pub is_enabled: bool,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 更新日時
    pub updated_at: DateTime<Utc>,
    /// 論理削除日時
    #[serde(default, skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// フィーチャーフラグ作成時の入力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeatureFlag {
    /// フラグ名
    pub name: String,
    /// 説明
    #[serde(default)]
    pub description: String,
    /// 有効フラグ
    #[serde(default)]
    pub is_enabled: bool,
}

/// フィーチャーフラグの部分更新
///
/// `None` のフィールドは既存の値を維持する
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlagUpdate {
    /// 新しいフラグ名
    #[serde(default)]
    pub name: Option<String>,
    /// 新しい説明
    #[serde(default)]
    pub description: Option<String>,
    /// 新しい有効フラグ
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

impl FeatureFlag {
    /// 部分更新を適用した新しい値を返す（`updated_at` は呼び出し側で設定）
    pub fn merged(&self, update: &FeatureFlagUpdate) -> FeatureFlag {
        FeatureFlag {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            description: update
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            is_enabled: update.is_enabled.unwrap_or(self.is_enabled),
            ..self.clone()
        }
    }
}
