//! 認証ゲートウェイ
//!
//! 登録・ログイン・リクエスト認可のオーケストレーション。
//! 外部には `AuthError` の粗いカテゴリのみを返し、詳細はログに残す。

use super::jwt::{TokenIssuer, TokenValidator};
use super::password::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::db::UserStore;
use chrono::Duration;
use flag_service_common::auth::{Claims, User};
use flag_service_common::config::AuthConfig;
use flag_service_common::error::{AuthError, AuthResult, CommonError};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task;

/// 未登録ユーザーのログイン時に照合するダミーパスワード
const DUMMY_PASSWORD: &str = "flag-service-dummy-password";

/// ログイン成功時に発行されるトークン
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// JWTトークン
    pub token: String,
    /// トークン有効期限（秒）
    pub expires_in: i64,
}

/// 認証ゲートウェイ
///
/// 共有する状態は読み取り専用のシークレットとユーザーストアのみ
#[derive(Clone)]
pub struct AuthGateway {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    validator: TokenValidator,
    // 未登録ユーザー用の照合ダイジェスト（初回ログイン失敗時に生成）
    dummy_digest: Arc<OnceCell<String>>,
}

impl AuthGateway {
    /// 構成要素を指定して作成
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        validator: TokenValidator,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
            validator,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    /// 認証設定から作成
    ///
    /// # Returns
    /// * `Err(CommonError::Config)` - シークレット未設定、TTLやコストが不正
    pub fn from_config(users: Arc<dyn UserStore>, config: &AuthConfig) -> Result<Self, CommonError> {
        config.validate()?;
        // validate() で i64 に収まることを確認済み
        let ttl = Duration::seconds(config.token_ttl_secs as i64);

        Ok(Self::new(
            users,
            PasswordHasher::new(config.bcrypt_cost),
            TokenIssuer::new(&config.jwt_secret, ttl),
            TokenValidator::new(&config.jwt_secret),
        ))
    }

    /// ユーザー登録
    ///
    /// # Returns
    /// * `Ok(User)` - 作成されたユーザー
    /// * `Err(AuthError::Validation)` - ユーザー名/パスワードが空、またはパスワードが長すぎる
    /// * `Err(AuthError::Conflict)` - ユーザー名が使用済み
    /// * `Err(AuthError::Internal)` - ストア/ハッシュ化の失敗
    pub async fn register(&self, username: &str, password: &str) -> AuthResult<User> {
        validate_credentials(username, password)?;

        if self.users.find_by_username(username).await?.is_some() {
            tracing::info!(username = %username, "Registration rejected: username already taken");
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hash_password(password.to_string()).await?;

        // 同時登録の競合はストアの一意制約で検出され Conflict になる
        let user = self.users.create(username, &password_hash).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// ログイン
    ///
    /// 未登録ユーザーとパスワード不一致は区別せず `Unauthorized` を返す。
    /// 72バイトを超えるパスワードはbcryptに渡さず拒否する（先頭72バイトのみで照合されるため）。
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<IssuedToken> {
        if password.len() > MAX_PASSWORD_BYTES {
            tracing::debug!(username = %username, "Login failed: password too long");
            return Err(AuthError::Unauthorized);
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            // 応答時間でユーザーの有無が分からないよう、ダミーのダイジェストで照合する
            let digest = self.dummy_digest().await?;
            self.verify_password(password.to_string(), digest).await?;
            tracing::debug!(username = %username, "Login failed: unknown user");
            return Err(AuthError::Unauthorized);
        };

        let is_valid = self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?;
        if !is_valid {
            tracing::debug!(username = %username, "Login failed: password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let token = self.issuer.issue(&user.username).map_err(|e| {
            tracing::error!("Failed to issue token: {}", e);
            AuthError::Internal(e.to_string())
        })?;

        Ok(IssuedToken {
            token,
            expires_in: self.issuer.ttl().num_seconds(),
        })
    }

    /// リクエストの認可
    ///
    /// 検証失敗の種類（構造/署名/期限）はログにのみ残し、呼び出し側には `Unauthorized` を返す
    pub fn authorize(&self, token: &str) -> AuthResult<Claims> {
        self.validator.validate(token).map_err(|e| {
            tracing::warn!("JWT verification failed: {}", e);
            AuthError::Unauthorized
        })
    }

    async fn dummy_digest(&self) -> AuthResult<String> {
        self.dummy_digest
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
            .await
            .cloned()
    }

    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = self.hasher;
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Failed to join password hasher: {e}")))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: String, digest: String) -> AuthResult<bool> {
        let hasher = self.hasher;
        task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AuthError::Internal(format!("Failed to join password verifier: {e}")))?
            .map_err(|e| {
                tracing::error!("Stored password hash is unreadable: {}", e);
                AuthError::from(e)
            })
    }
}

fn validate_credentials(username: &str, password: &str) -> AuthResult<()> {
    if username.is_empty() {
        return Err(AuthError::Validation("username is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("password is required".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::Validation(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}
