//! HTTP取得・送信のテスト
//!
//! ローカルの TcpListener で1回だけ応答するサーバーを立てる。

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use warehouse_scan::error::AppError;
use warehouse_scan::source::{HttpSheetSource, TabularSource};
use warehouse_scan::submit::{ExcessSink, HttpExcessSink};
use warehouse_scan_common::{ExcessLookup, ExcessRecord, ExcessRecordBuilder, ShipmentType};

const TIMEOUT: Duration = Duration::from_secs(5);

/// ヘッダー終端の位置（`\r\n\r\n` の直後）
fn header_end(request: &[u8]) -> Option<usize> {
    request.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn content_length(headers: &[u8]) -> usize {
    String::from_utf8_lossy(headers)
        .lines()
        .find_map(|line| {
            let lower = line.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(0)
}

/// リクエストを最後まで読んでから、決まったレスポンスを1回だけ返す
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = header_end(&request) {
                if request.len() >= end + content_length(&request[..end]) {
                    break;
                }
            }
        }

        let response = format!(
            "{}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}/", addr)
}

fn record() -> ExcessRecord {
    ExcessRecordBuilder::new()
        .with_lookup(ExcessLookup {
            barcode: "ABC123".into(),
            unit_count: "3".into(),
            customer: "Acme".into(),
        })
        .shipment_type(ShipmentType::Booking)
        .weight(18.0)
        .length(100.0)
        .width(60.0)
        .height(40.0)
        .build()
        .unwrap()
}

// ============================================
// シート取得
// ============================================

#[tokio::test]
async fn test_sheet_fetch_ok() {
    let url = serve_once("HTTP/1.1 200 OK", "code,pcs\nABC123,3").await;
    let store = HttpSheetSource::new(url, TIMEOUT).unwrap().load().await.unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.cell(1, 1), Some("3"));
}

#[tokio::test]
async fn test_sheet_fetch_not_found_is_http_status() {
    let url = serve_once("HTTP/1.1 404 Not Found", "").await;
    let err = HttpSheetSource::new(url.clone(), TIMEOUT)
        .unwrap()
        .load()
        .await
        .unwrap_err();

    match err {
        AppError::HttpStatus { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("HttpStatus expected: {:?}", other),
    }
}

// ============================================
// 送信
// ============================================

#[tokio::test]
async fn test_submit_ok() {
    let url = serve_once("HTTP/1.1 200 OK", r#"{"success": true, "message": "Guardado"}"#).await;
    let sink = HttpExcessSink::new(url, TIMEOUT).unwrap();
    let response = sink.submit(&record()).await.unwrap();

    assert_eq!(response.message.as_deref(), Some("Guardado"));
}

#[tokio::test]
async fn test_submit_not_found_is_submission_error() {
    let url = serve_once("HTTP/1.1 404 Not Found", "").await;
    let sink = HttpExcessSink::new(url, TIMEOUT).unwrap();
    let err = sink.submit(&record()).await.unwrap_err();

    assert!(matches!(err, AppError::Submission(ref m) if m.contains("404")));
}

#[tokio::test]
async fn test_submit_html_body_is_parse_error() {
    let url = serve_once("HTTP/1.1 200 OK", "<html>Moved</html>").await;
    let sink = HttpExcessSink::new(url, TIMEOUT).unwrap();
    let err = sink.submit(&record()).await.unwrap_err();

    assert!(matches!(err, AppError::SubmissionParse(_)));
}
