use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("シートの読み込みに失敗: {0}")]
    DataLoad(String),

    #[error("HTTPエラー: {status} ({url})")]
    HttpStatus { status: u16, url: String },

    #[error("スキャナーを開けません: {0}")]
    DeviceAccess(String),

    #[error("送信に失敗: {0}")]
    Submission(String),

    #[error("送信結果のパースに失敗: {0}")]
    SubmissionParse(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] warehouse_scan_common::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
