//! 設定管理
//!
//! ServerConfig, StorageBackend, AuthConfig等の設定構造体

use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// bcryptが受け付けるコストの範囲
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// サーバー設定
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// ストレージバックエンド
    pub storage: StorageBackend,

    /// 認証設定
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// バインドアドレス（host:port）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 起動前の設定検証
    pub fn validate(&self) -> Result<(), CommonError> {
        self.auth.validate()
    }
}

/// ストレージバックエンドの選択
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite（sqlx接続プール）
    Sqlite {
        /// データベースURL（例: "sqlite:data/flags.db"）
        database_url: String,
    },
    /// プロセス内メモリ（再起動で消える）
    Memory,
}

/// 認証設定
///
/// 署名用シークレットを含むため、Debug出力ではマスクする
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT署名用シークレット
    pub jwt_secret: String,

    /// トークン有効期限（秒）(デフォルト: 86400)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// bcryptコスト (デフォルト: 12)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// シークレットを指定し、その他はデフォルト値で作成
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: default_token_ttl(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }

    /// 設定値の検証
    pub fn validate(&self) -> Result<(), CommonError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(CommonError::Config("JWT secret must not be empty".to_string()));
        }
        if self.token_ttl_secs == 0 {
            return Err(CommonError::Config(
                "Token TTL must be greater than zero".to_string(),
            ));
        }
        if i64::try_from(self.token_ttl_secs).is_err() {
            return Err(CommonError::Config(format!(
                "Token TTL is too large: {}",
                self.token_ttl_secs
            )));
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(CommonError::Config(format!(
                "bcrypt cost must be between {} and {}: got {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end(),
                self.bcrypt_cost
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_token_ttl() -> u64 {
    24 * 60 * 60
}

fn default_bcrypt_cost() -> u32 {
    12
}
