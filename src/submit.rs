//! 過大荷物レコードの送信

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;
use warehouse_scan_common::{ExcessRecord, SubmissionResponse};

/// 送信先
#[async_trait]
pub trait ExcessSink {
    /// 送信してレスポンス本文を返す
    async fn post_form(&self, fields: &[(&'static str, String)]) -> Result<String>;

    /// 送信して結果を判定（再試行はしない）
    async fn submit(&self, record: &ExcessRecord) -> Result<SubmissionResponse> {
        let body = self.post_form(&record.to_form_fields()).await?;
        let response = interpret_response(&body)?;
        tracing::info!(barcode = %record.barcode, "excess record submitted");
        Ok(response)
    }
}

/// レスポンス本文を判定
///
/// JSON以外は `SubmissionParse`、`success: false` は `Submission`。
pub fn interpret_response(body: &str) -> Result<SubmissionResponse> {
    let response = SubmissionResponse::parse(body).map_err(|e| {
        tracing::debug!("non-JSON submission response: {}", body);
        AppError::SubmissionParse(e.to_string())
    })?;

    if response.success {
        Ok(response)
    } else {
        Err(AppError::Submission(response.failure_reason()))
    }
}

/// フォームPOSTで送信
#[derive(Debug, Clone)]
pub struct HttpExcessSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExcessSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Submission(format!("HTTPクライアントの作成に失敗: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ExcessSink for HttpExcessSink {
    async fn post_form(&self, fields: &[(&'static str, String)]) -> Result<String> {
        tracing::debug!("Posting excess record to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .form(fields)
            .send()
            .await
            .map_err(|e| AppError::Submission(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Submission(format!(
                "HTTP {} ({})",
                status.as_u16(),
                self.endpoint
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Submission(e.to_string()))
    }
}
