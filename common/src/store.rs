//! 表形式データストア
//!
//! スプレッドシートから読み込んだ行データを保持する。
//! 読み込み後は不変で、再読み込み時は丸ごと差し替える。

use serde::{Deserialize, Serialize};

/// 1行分のセル
///
/// 行ごとに長さが異なる。存在しないセルは空文字列ではなく `None` として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    /// セルを取得（範囲外は None）
    pub fn get(&self, column: usize) -> Option<&str> {
        self.0.get(column).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<&str>> for Row {
    fn from(cells: Vec<&str>) -> Self {
        Self(cells.into_iter().map(String::from).collect())
    }
}

/// ストアの概要（読み込み結果の表示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSummary {
    /// 行数（ヘッダー行を含む）
    pub rows: usize,
    /// 最も長い行のセル数
    pub widest_row: usize,
}

/// 全行データ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularStore {
    rows: Vec<Row>,
}

impl TabularStore {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// (行, 列) のセルを取得
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 先頭n行
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            rows: self.rows.len(),
            widest_row: self.rows.iter().map(Row::len).max().unwrap_or(0),
        }
    }
}

impl FromIterator<Row> for TabularStore {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TabularStore {
        TabularStore::new(vec![
            Row::from(vec!["code", "pcs", "customer"]),
            Row::from(vec!["A1", "2"]),
            Row::from(vec![""]),
        ])
    }

    #[test]
    fn test_cell_access() {
        let store = sample();
        assert_eq!(store.cell(0, 2), Some("customer"));
        assert_eq!(store.cell(1, 1), Some("2"));
        // 短い行の欠損セルは None
        assert_eq!(store.cell(1, 2), None);
        assert_eq!(store.cell(9, 0), None);
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.widest_row, 3);
        assert_eq!(TabularStore::default().summary().widest_row, 0);
    }

    #[test]
    fn test_head_is_clamped() {
        let store = sample();
        assert_eq!(store.head(2).len(), 2);
        assert_eq!(store.head(10).len(), 3);
    }
}
