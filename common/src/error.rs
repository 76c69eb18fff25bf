//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Incomplete excess record: missing {0}")]
    IncompleteRecord(&'static str),

    #[error("Invalid dimension: {0} must be a positive number")]
    InvalidDimension(&'static str),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
