//! ログ設定
//!
//! 診断ログは stderr、利用者向けの出力は stdout（`println!`）に分ける。
//! `RUST_LOG` があればそちらを優先する。

use crate::error::{AppError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 既定のフィルタ
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warehouse_scan=debug,warehouse_scan_common=debug"
    } else {
        "warn"
    }
}

pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .try_init()
        .map_err(|e| AppError::Config(format!("ログ初期化に失敗: {e}")))
}
