use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use warehouse_scan::{cli, config, error, excess_form, logging, scan, source, submit};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use scan::{LineFrameSource, ScanEvent};
use source::TabularSource;
use submit::ExcessSink;
use warehouse_scan_common::{
    column_letter, ExcessRecordBuilder, LookupEvent, LookupSession, MatchResult, TabularStore,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    let config = Config::load()?;

    match cli.command {
        Commands::Load { head } => {
            println!("📋 warehouse-scan - シート読み込み\n");

            let store = load_sheet(cli.sheet.as_deref(), &config).await?;
            let summary = store.summary();
            println!("✔ {}行を読み込み（最大{}列）\n", summary.rows, summary.widest_row);

            for (i, row) in store.head(head).iter().enumerate() {
                println!("  {:>3}: {}", i, row.cells().join(" | "));
            }
        }

        Commands::Lookup { code } => {
            let store = load_sheet(cli.sheet.as_deref(), &config).await?;
            let layout = config::resolve_layout(cli.layout.as_deref().unwrap_or(&config.layout))?;
            let mut session = LookupSession::new(Arc::new(store), layout, config.timings.clone());

            match session.submit(&code, Instant::now()) {
                Some(event) => print_event(&event),
                None => println!("コードが空です"),
            }
        }

        Commands::Scan { frames, pacing_ms } => {
            println!("📷 warehouse-scan - スキャン\n");

            let store = load_sheet(cli.sheet.as_deref(), &config).await?;
            let layout = config::resolve_layout(cli.layout.as_deref().unwrap_or(&config.layout))?;
            let mut session = LookupSession::new(Arc::new(store), layout, config.timings.clone());
            let pacing = Duration::from_millis(pacing_ms);

            let on_event = |event: &ScanEvent| match event {
                ScanEvent::Resolved(lookup) => print_event(lookup),
                ScanEvent::Ready => println!("  … スキャン待ち"),
            };

            let resolved = match frames {
                Some(path) => {
                    let mut source = LineFrameSource::open(&path).await?;
                    scan::run_scan(&mut session, &mut source, pacing, on_event).await?
                }
                None => {
                    println!("読み取り結果を1行ずつ入力してください（Ctrl-Dで終了）\n");
                    let mut source = LineFrameSource::stdin();
                    scan::run_scan(&mut session, &mut source, pacing, on_event).await?
                }
            };

            println!("\n✔ {}件を照会", resolved);
            if !session.history().is_empty() {
                println!("\n履歴（新しい順）:");
                for entry in session.history().iter() {
                    println!(
                        "  {} {} → {} ({}) {}",
                        entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S"),
                        entry.code,
                        entry.zone,
                        entry.color,
                        entry.address
                    );
                }
            }
        }

        Commands::Excess {
            barcode,
            shipment_type,
            weight,
            length,
            width,
            height,
            dry_run,
        } => {
            println!("📦 warehouse-scan - 過大荷物\n");

            // 1. シート照会
            println!("[1/2] バーコードを照会中...");
            let location = match cli.sheet {
                Some(sheet) => sheet,
                None => config.excess_sheet_location()?,
            };
            let store = source::open_source(&location, config.timeout())?.load().await?;

            let mut builder = ExcessRecordBuilder::new();
            if !builder.lookup(&barcode, &store) {
                println!("✗ {} はシートにありません", barcode.trim());
                return Ok(());
            }
            if let Some(found) = builder.looked_up() {
                println!("✔ 個数: {}  顧客: {}\n", found.unit_count, found.customer);
            }

            // 2. 重量・寸法
            println!("[2/2] 重量と寸法");
            let args = excess_form::ExcessArgs {
                shipment_type,
                weight,
                length,
                width,
                height,
            };
            let builder = excess_form::prompt_missing(excess_form::apply_args(builder, &args))?;
            let record = builder.build()?;

            if dry_run {
                println!("\n送信内容（ドライラン）:");
                for (name, value) in record.to_form_fields() {
                    println!("  {} = {}", name, value);
                }
                return Ok(());
            }

            let sink = submit::HttpExcessSink::new(config.excess_endpoint()?, config.timeout())?;
            let response = sink.submit(&record).await?;
            println!(
                "\n✅ 送信完了{}",
                response.message.map(|m| format!(": {}", m)).unwrap_or_default()
            );
        }

        Commands::Config {
            set_sheet_url,
            set_excess_sheet_url,
            set_excess_url,
            set_layout,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_sheet_url {
                config.sheet_csv_url = Some(url);
                changed = true;
                println!("✔ シートURLを設定しました");
            }

            if let Some(url) = set_excess_sheet_url {
                config.excess_sheet_url = Some(url);
                changed = true;
                println!("✔ 過大荷物シートのURLを設定しました");
            }

            if let Some(url) = set_excess_url {
                config.excess_endpoint = Some(url);
                changed = true;
                println!("✔ 送信先を設定しました");
            }

            if let Some(layout) = set_layout {
                config::resolve_layout(&layout)?;
                config.layout = layout;
                changed = true;
                println!("✔ レイアウトを設定しました");
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  シート: {}", config.sheet_csv_url.as_deref().unwrap_or("未設定"));
                println!(
                    "  過大荷物シート: {}",
                    config.excess_sheet_url.as_deref().unwrap_or("（仕分けシートと同じ）")
                );
                println!("  送信先: {}", config.excess_endpoint.as_deref().unwrap_or("未設定"));
                println!("  レイアウト: {}", config.layout);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

async fn load_sheet(sheet: Option<&str>, config: &Config) -> Result<TabularStore> {
    let location = match sheet {
        Some(s) => s.to_string(),
        None => config.sheet_location()?,
    };
    source::open_source(&location, config.timeout())?.load().await
}

fn print_event(event: &LookupEvent) {
    match &event.result {
        MatchResult::Found {
            row_index,
            code_column,
            zone,
            color,
            address,
        } => {
            println!("✔ {} → {} ({})", event.code, zone, color);
            println!("  住所: {}", address);
            println!("  行: {}  列: {}", row_index, column_letter(*code_column));
        }
        MatchResult::NotFound => {
            println!("✗ {} は見つかりません", event.code);
        }
    }
    tracing::debug!(pattern = ?event.feedback.vibration_pattern(), "feedback");
}
