//! シートの取得（HTTP / ローカルファイル）

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use warehouse_scan_common::{parse_csv, TabularStore};

/// CSVテキストの取得元
#[async_trait]
pub trait TabularSource {
    /// 表示用の場所
    fn location(&self) -> String;

    async fn fetch_text(&self) -> Result<String>;

    /// 取得してパース
    async fn load(&self) -> Result<TabularStore> {
        let text = self.fetch_text().await?;
        let store = parse_csv(&text);
        tracing::info!(source = %self.location(), rows = store.len(), "sheet loaded");
        Ok(store)
    }
}

/// 公開CSVのURLから取得
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSheetSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::DataLoad(format!("HTTPクライアントの作成に失敗: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TabularSource for HttpSheetSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch_text(&self) -> Result<String> {
        tracing::debug!("Fetching sheet from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::DataLoad(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| AppError::DataLoad(e.to_string()))
    }
}

/// ローカルのCSVファイル
#[derive(Debug, Clone)]
pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TabularSource for FileSheetSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_text(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(AppError::FileNotFound(self.location()));
        }
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// URLかパスかを見て取得元を選ぶ
pub fn open_source(location: &str, timeout: Duration) -> Result<Box<dyn TabularSource + Send + Sync>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSheetSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileSheetSource::new(location)))
    }
}
