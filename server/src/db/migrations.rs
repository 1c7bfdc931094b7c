// データベース作成とマイグレーション実行

use flag_service_common::error::{StoreError, StoreResult};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::path::PathBuf;

/// SQLiteデータベース接続プールを作成してマイグレーションを実行
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:data/flags.db", "sqlite::memory:"）
///
/// # Returns
/// * `Ok(SqlitePool)` - 初期化済みデータベースプール
/// * `Err(StoreError)` - 初期化失敗
pub async fn initialize_database(database_url: &str) -> StoreResult<SqlitePool> {
    if let Some(parent) = database_file_path(database_url).and_then(|p| p.parent().map(PathBuf::from)) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(&parent).map_err(|e| {
                StoreError::Database(format!("Failed to create data directory: {}", e))
            })?;
        }
    }

    // データベースファイルが存在しない場合は作成
    if !Sqlite::database_exists(database_url)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to check database: {}", e)))?
    {
        tracing::info!("Creating database: {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to create database: {}", e)))?;
    }

    // インメモリDBは接続ごとに別のDBになるため、単一接続を保持し続ける
    let pool = if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await
    } else {
        SqlitePool::connect(database_url).await
    }
    .map_err(|e| StoreError::Database(format!("Failed to connect to database: {}", e)))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// マイグレーションを実行（sqlx::migrate!マクロを使用）
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to run migrations: {}", e)))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// "sqlite:path/to.db?mode=rwc" 形式のURLからファイルパスを取り出す
fn database_file_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) {
        return None;
    }
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
