use clap::{Parser, Subcommand};
use std::path::PathBuf;
use warehouse_scan_common::ShipmentType;

#[derive(Parser)]
#[command(name = "warehouse-scan")]
#[command(about = "倉庫仕分けスキャナー（バーコード照会・過大荷物記録）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 仕分けシート（URL またはCSVファイル、設定より優先）
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// レイアウト（three-zone/four-zone またはJSONファイル）
    #[arg(long, global = true)]
    pub layout: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// シートを読み込んで行数と先頭行を表示
    Load {
        /// 表示する先頭行数
        #[arg(long, default_value = "5")]
        head: usize,
    },

    /// コードを手入力で照会
    Lookup {
        /// 照会するコード
        #[arg(required = true)]
        code: String,
    },

    /// 読み取り結果を1行ずつ受け取って照会（既定は標準入力）
    Scan {
        /// 読み取り結果のファイル
        #[arg(short, long)]
        frames: Option<PathBuf>,

        /// 1件ごとの待ち時間 (ms)
        #[arg(long, default_value = "0")]
        pacing_ms: u64,
    },

    /// 過大荷物を記録
    Excess {
        /// バーコード
        #[arg(required = true)]
        barcode: String,

        /// 出荷区分 (delivery/booking)
        #[arg(short = 't', long = "type")]
        shipment_type: Option<ShipmentType>,

        /// 重量 (kg)
        #[arg(long)]
        weight: Option<f64>,

        /// 長さ (cm)
        #[arg(long)]
        length: Option<f64>,

        /// 幅 (cm)
        #[arg(long)]
        width: Option<f64>,

        /// 高さ (cm)
        #[arg(long)]
        height: Option<f64>,

        /// 送信せずにフォーム内容を表示
        #[arg(long)]
        dry_run: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 仕分けシートのURLを設定
        #[arg(long)]
        set_sheet_url: Option<String>,

        /// 過大荷物シートのURLを設定
        #[arg(long)]
        set_excess_sheet_url: Option<String>,

        /// 過大荷物の送信先を設定
        #[arg(long)]
        set_excess_url: Option<String>,

        /// 既定のレイアウトを設定
        #[arg(long)]
        set_layout: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
