//! ゾーン列レイアウト
//!
//! どの列にバーコードが入っているか、そのゾーン名・表示色・
//! 住所列はどこかを定義する。シートの列構成は拠点ごとに異なるため
//! データからは推測せず、プリセットかJSONで外部から与える。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// バーコード列1つ分の定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneColumn {
    /// バーコード列（0始まり）
    pub code_column: usize,
    /// ゾーン名
    pub zone: String,
    /// 表示色（CSSカラー）
    pub color: String,
    /// 住所列（0始まり）
    pub address_column: usize,
}

impl ZoneColumn {
    pub fn new(code_column: usize, zone: &str, color: &str, address_column: usize) -> Self {
        Self {
            code_column,
            zone: zone.to_string(),
            color: color.to_string(),
            address_column,
        }
    }
}

/// ゾーン列マップ
///
/// 宣言順が照合の優先順になる（最初に一致した列が採用される）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneColumnMap {
    columns: Vec<ZoneColumn>,
}

impl ZoneColumnMap {
    /// 列定義から生成（コード列の重複・空マップは不可）
    pub fn new(columns: Vec<ZoneColumn>) -> Result<Self> {
        let map = Self { columns };
        map.validate()?;
        Ok(map)
    }

    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "three-zone" | "3" | "3-zone" => Some(Self::three_zone()),
            "four-zone" | "4" | "4-zone" => Some(Self::four_zone()),
            _ => None,
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let map: Self = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 3ゾーン構成（I/J, K/L, M/N列）
    pub fn three_zone() -> Self {
        Self {
            columns: vec![
                ZoneColumn::new(9, "Indust", "#000000", 8),
                ZoneColumn::new(11, "Centre", "#ff0000", 10),
                ZoneColumn::new(13, "Altres", "#00ff00", 12),
            ],
        }
    }

    /// 4ゾーン構成（コード列の右隣が住所列）
    pub fn four_zone() -> Self {
        Self {
            columns: vec![
                ZoneColumn::new(1, "Indust", "#000000", 2),
                ZoneColumn::new(3, "Centre", "#ff0000", 4),
                ZoneColumn::new(5, "Mira", "#00ff00", 6),
                ZoneColumn::new(7, "Fàbriques", "#0000ff", 8),
            ],
        }
    }

    pub fn columns(&self) -> &[ZoneColumn] {
        &self.columns
    }

    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::InvalidLayout("コード列が定義されていません".into()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.code_column) {
                return Err(Error::InvalidLayout(format!(
                    "コード列が重複しています: {}",
                    column.code_column
                )));
            }
        }
        Ok(())
    }
}

/// 0始まりの列番号をスプレッドシートの列記号に変換
///
/// # Examples
/// ```
/// use warehouse_scan_common::column_letter;
///
/// assert_eq!(column_letter(0), "A");
/// assert_eq!(column_letter(9), "J");
/// assert_eq!(column_letter(26), "AA");
/// ```
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let remainder = (n - 1) % 26;
        letters.push((b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
