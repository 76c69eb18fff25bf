//! warehouse-scan
//!
//! 仕分けシートの取得、スキャンループ、過大荷物の送信。
//! 照合・確定ロジックは `warehouse_scan_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod excess_form;
pub mod logging;
pub mod scan;
pub mod source;
pub mod submit;
