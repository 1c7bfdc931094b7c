// 認証モジュール

/// パスワードハッシュ化・検証（bcrypt）
pub mod password;

/// JWT生成・検証（jsonwebtoken）
pub mod jwt;

/// 登録・ログイン・認可のオーケストレーション
pub mod gateway;

/// 認証ミドルウェア（Bearer JWT）
pub mod middleware;

pub use gateway::{AuthGateway, IssuedToken};
