// JWT生成と検証（jsonwebtoken実装、HS256）

use chrono::{Duration, Utc};
use flag_service_common::auth::Claims;
use flag_service_common::error::TokenError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

/// JWT署名アルゴリズム
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT発行者
///
/// ステートレス: 発行したトークンはサーバー側に保存しない
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// シークレットと有効期限からJWT発行者を作成
    ///
    /// # Arguments
    /// * `secret` - JWT署名用シークレット
    /// * `ttl` - トークン有効期限
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// トークン有効期限
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// JWTトークンを生成
    ///
    /// # Arguments
    /// * `subject` - ユーザー名
    ///
    /// # Returns
    /// * `Ok(String)` - JWTトークン（3つのドット区切り部分）
    /// * `Err(TokenError::Signing)` - 生成失敗
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("Failed to calculate expiration time".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.key)
            .map_err(|e| TokenError::Signing(format!("Failed to create JWT: {}", e)))
    }
}

/// JWT検証者
///
/// ネットワークやストレージにはアクセスしない（トークン・シークレット・現在時刻のみで判定）
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// シークレットからJWT検証者を作成
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// JWTトークンを検証
    ///
    /// 構造 → 署名 → 有効期限 の順に検証する
    ///
    /// # Returns
    /// * `Ok(Claims)` - 検証済みクレーム
    /// * `Err(TokenError::Malformed)` - 構造が不正
    /// * `Err(TokenError::InvalidSignature)` - 署名不一致（改ざん）
    /// * `Err(TokenError::Expired)` - 有効期限切れ
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify_jwt_error)?;

        // jsonwebtokenは exp == now を有効とみなすため、ここで厳密に判定する
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn classify_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        // アルゴリズムのすり替えも改ざんとして扱う
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed(err.to_string()),
    }
}
