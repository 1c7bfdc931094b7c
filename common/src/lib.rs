//! Flag Service Common Library
//!
//! 共通型定義、認証モデル、設定、エラー型を提供

#![warn(missing_docs)]

/// 認証関連のデータモデル
pub mod auth;

/// フィーチャーフラグの型定義
pub mod types;

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;
