//! ロギング初期化ユーティリティ
//!
//! `tracing` による構造化ロギングを標準出力と日次ローテーションのJSONラインファイルへ出力する。

use chrono::{NaiveDate, Utc};
use std::{
    env, fs,
    io::{self, Error, ErrorKind},
    path::{Path, PathBuf},
    sync::OnceLock,
};
use tracing_appender::{
    non_blocking,
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログファイル名のプレフィックス（`flag-service.YYYY-MM-DD.jsonl`）
pub const LOG_FILE_PREFIX: &str = "flag-service";
/// ログファイル名のサフィックス（JSON Lines）
pub const LOG_FILE_SUFFIX: &str = "jsonl";

const LOG_SUBDIR: &str = "logs";
const DEFAULT_DATA_DIR: &str = ".flag-service";
const DEFAULT_RETENTION_DAYS: usize = 7;

const LOG_DIR_ENV: &str = "FLAG_SERVICE_LOG_DIR";
const LOG_LEVEL_ENV: &str = "FLAG_SERVICE_LOG_LEVEL";
const LOG_RETENTION_DAYS_ENV: &str = "FLAG_SERVICE_LOG_RETENTION_DAYS";
const ALT_LEVEL_ENV: &str = "RUST_LOG";

static LOGGER_GUARD: OnceLock<Result<LoggerGuard, io::Error>> = OnceLock::new();

struct LoggerGuard {
    _file_guard: WorkerGuard,
}

/// ログ出力を初期化する。
///
/// 2回目以降の呼び出しは初回の結果を返す。
pub fn init() -> io::Result<()> {
    match LOGGER_GUARD.get_or_init(configure_logger) {
        Ok(_) => Ok(()),
        Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
    }
}

/// ログディレクトリのパスを返す。
pub fn log_dir() -> io::Result<PathBuf> {
    if let Ok(dir) = env::var(LOG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    // デフォルト: ~/.flag-service/logs
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| Error::new(ErrorKind::NotFound, "Failed to resolve home directory"))?;

    Ok(PathBuf::from(home).join(DEFAULT_DATA_DIR).join(LOG_SUBDIR))
}

/// 保持日数を取得する（0以下や不正値はデフォルト）。
fn get_retention_days() -> usize {
    env::var(LOG_RETENTION_DAYS_ENV)
        .ok()
        .and_then(|val| val.trim().parse().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_RETENTION_DAYS)
}

/// 日次ローテーションするファイルアペンダーを作成する。
///
/// 稼働中のローテーション時には `retention_days` 個を超えた古いファイルが削除される。
fn file_appender(log_dir: &Path, retention_days: usize) -> io::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(retention_days)
        .build(log_dir)
        .map_err(Error::other)
}

/// `flag-service.YYYY-MM-DD.jsonl` から日付部分を取り出す。
fn log_file_date(filename: &str) -> Option<NaiveDate> {
    let date = filename
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_FILE_SUFFIX)?
        .strip_suffix('.')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// 起動時に保持日数を過ぎたログファイルを削除する。
///
/// アペンダーによる削除はローテーション時にしか行われないため、
/// 長期間停止していた後の起動時はここで整理する。
fn cleanup_old_logs(log_dir: &Path, retention_days: usize) -> io::Result<()> {
    if !log_dir.exists() {
        return Ok(());
    }

    let cutoff = Utc::now().date_naive() - chrono::Duration::days(retention_days as i64);

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let expired = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(log_file_date)
            .is_some_and(|date| date < cutoff);
        if expired {
            let _ = fs::remove_file(&path);
        }
    }
    Ok(())
}

fn configure_logger() -> io::Result<LoggerGuard> {
    let log_directory = log_dir()?;
    fs::create_dir_all(&log_directory)?;

    let retention_days = get_retention_days();
    cleanup_old_logs(&log_directory, retention_days)?;

    let (file_writer, file_guard) = non_blocking(file_appender(&log_directory, retention_days)?);

    // 優先順位: FLAG_SERVICE_LOG_LEVEL > RUST_LOG > info
    let env_filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .or_else(|_| EnvFilter::try_from_env(ALT_LEVEL_ENV))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(true);

    let stdout_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(Error::other)?;

    tracing::info!(
        category = "system",
        retention_days,
        "Flag service logs initialized: {}",
        log_directory.display()
    );

    Ok(LoggerGuard {
        _file_guard: file_guard,
    })
}
