//! スキャンループ
//!
//! 読み取り結果を1行ずつ受け取り、照会セッションに流す。
//! 結果表示の解除はタイマーで拾う。

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use warehouse_scan_common::{LookupEvent, LookupSession};

const POLL_TICK: Duration = Duration::from_millis(100);

/// 読み取り結果の供給元
#[async_trait]
pub trait FrameSource {
    /// 次の読み取り結果。終端で None、空文字は読み取り失敗
    async fn next_frame(&mut self) -> Result<Option<String>>;
}

/// 1行1読み取りのテキスト
pub struct LineFrameSource<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: AsyncRead + Unpin> LineFrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }
}

impl LineFrameSource<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl LineFrameSource<tokio::fs::File> {
    pub async fn open(path: &Path) -> Result<Self> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| AppError::DeviceAccess(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(file))
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> FrameSource for LineFrameSource<R> {
    async fn next_frame(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .await
            .map_err(|e| AppError::DeviceAccess(e.to_string()))
    }
}

/// ループから通知するイベント
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// 照会した
    Resolved(LookupEvent),
    /// 結果表示が終わり、次のスキャンを受け付ける
    Ready,
}

/// 供給元が尽きるまでスキャンを回す。照会した回数を返す
///
/// `pacing` は読み取り1件ごとの待ち時間（ファイル再生用）。
pub async fn run_scan<F>(
    session: &mut LookupSession,
    frames: &mut F,
    pacing: Duration,
    mut on_event: impl FnMut(&ScanEvent),
) -> Result<usize>
where
    F: FrameSource + Send,
{
    let mut tick = tokio::time::interval(POLL_TICK);
    let mut resolved = 0;

    loop {
        tokio::select! {
            frame = frames.next_frame() => {
                let Some(raw) = frame? else {
                    break;
                };
                if raw.trim().is_empty() {
                    tracing::debug!("decode failure, frame ignored");
                    continue;
                }
                if let Some(event) = session.on_detected_frame(&raw, Instant::now()) {
                    resolved += 1;
                    on_event(&ScanEvent::Resolved(event));
                }
                if !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
            }
            _ = tick.tick() => {
                if session.poll(Instant::now()) {
                    on_event(&ScanEvent::Ready);
                }
            }
        }
    }

    session.stop();
    Ok(resolved)
}
