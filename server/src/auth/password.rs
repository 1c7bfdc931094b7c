// パスワードハッシュ化と検証（bcrypt実装）

use bcrypt::{hash, verify};
use flag_service_common::error::PasswordError;

/// bcryptが扱えるパスワードの最大バイト長（これを超える部分は切り捨てられる）
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcryptによるパスワードハッシャー
///
/// ソルトはダイジェストに埋め込まれるため、同じパスワードでも毎回異なるハッシュになる
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// 指定したコストでハッシャーを作成
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// ハッシュ化コスト
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// パスワードをbcryptでハッシュ化
    ///
    /// # Arguments
    /// * `password` - ハッシュ化するパスワード
    ///
    /// # Returns
    /// * `Ok(String)` - bcryptハッシュ文字列（$2b$で始まる）
    /// * `Err(PasswordError)` - ハッシュ化失敗
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost)
            .map_err(|e| PasswordError::Hash(format!("Failed to hash password: {}", e)))
    }

    /// パスワードを検証
    ///
    /// # Arguments
    /// * `password` - 検証する平文パスワード
    /// * `digest` - 保存済みのbcryptハッシュ文字列
    ///
    /// # Returns
    /// * `Ok(true)` - パスワード一致
    /// * `Ok(false)` - パスワード不一致
    /// * `Err(PasswordError)` - 保存済みハッシュが不正
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        verify(password, digest)
            .map_err(|e| PasswordError::Hash(format!("Failed to verify password: {}", e)))
    }
}
