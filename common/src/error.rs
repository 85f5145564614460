//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ファイル名が命名規則に違反している
    #[error("Naming violation: {file_name} ({reason})")]
    NamingViolation { file_name: String, reason: String },

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
