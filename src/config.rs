use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use warehouse_scan_common::{ScanTimings, ZoneColumnMap};

pub const SHEET_URL_ENV: &str = "WAREHOUSE_SHEET_URL";
pub const EXCESS_URL_ENV: &str = "WAREHOUSE_EXCESS_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 仕分けシート（CSV公開URL またはローカルパス）
    pub sheet_csv_url: Option<String>,
    /// 過大荷物シート（CSV公開URL またはローカルパス）
    pub excess_sheet_url: Option<String>,
    /// 過大荷物の送信先
    pub excess_endpoint: Option<String>,
    /// レイアウト（プリセット名 または JSONファイル）
    pub layout: String,
    pub timeout_seconds: u64,
    pub timings: ScanTimings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_csv_url: None,
            excess_sheet_url: None,
            excess_endpoint: None,
            layout: "three-zone".into(),
            timeout_seconds: 30,
            timings: ScanTimings::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（無ければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("warehouse-scan").join("config.json"))
    }

    /// 仕分けシートの場所（環境変数を優先）
    pub fn sheet_location(&self) -> Result<String> {
        if let Ok(url) = std::env::var(SHEET_URL_ENV) {
            return Ok(url);
        }

        self.sheet_csv_url.clone().ok_or_else(|| {
            AppError::Config(
                "シートURLが未設定です。`warehouse-scan config --set-sheet-url URL` で設定してください"
                    .into(),
            )
        })
    }

    /// 過大荷物シートの場所（未設定なら仕分けシートと同じ）
    pub fn excess_sheet_location(&self) -> Result<String> {
        match &self.excess_sheet_url {
            Some(url) => Ok(url.clone()),
            None => self.sheet_location(),
        }
    }

    /// 送信先（環境変数を優先）
    pub fn excess_endpoint(&self) -> Result<String> {
        if let Ok(url) = std::env::var(EXCESS_URL_ENV) {
            return Ok(url);
        }

        self.excess_endpoint.clone().ok_or_else(|| {
            AppError::Config(
                "送信先が未設定です。`warehouse-scan config --set-excess-url URL` で設定してください"
                    .into(),
            )
        })
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// レイアウト指定（プリセット名 または JSONファイル）を解決
pub fn resolve_layout(name: &str) -> Result<ZoneColumnMap> {
    if let Some(map) = ZoneColumnMap::from_preset(name) {
        return Ok(map);
    }

    let path = Path::new(name);
    if path.exists() {
        return Ok(ZoneColumnMap::from_file(path)?);
    }

    tracing::warn!(layout = name, "unknown layout preset");
    Err(AppError::Config(format!(
        "レイアウトが見つかりません: {} (three-zone / four-zone / JSONファイル)",
        name
    )))
}
