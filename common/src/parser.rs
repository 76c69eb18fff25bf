//! スプレッドシートCSVパーサー
//!
//! 公開スプレッドシートのCSVエクスポートを行データに変換する。
//! 行は生の改行 (`\n`) で分割し、各行はダブルクォートで囲まれた
//! 区間のカンマをリテラルとして扱う。

use crate::store::{Row, TabularStore};

/// CSVテキスト全体をパース
///
/// 空行も1セル（空文字列）の行として保持する。行番号が
/// スプレッドシート上の位置と一致するよう、行は一切捨てない。
///
/// # Examples
/// ```
/// use warehouse_scan_common::parse_csv;
///
/// let store = parse_csv("code,pcs\n\"A1,A2\",3");
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.cell(1, 0), Some("A1,A2"));
/// ```
pub fn parse_csv(text: &str) -> TabularStore {
    let rows: Vec<Row> = text.split('\n').map(parse_csv_line).collect();
    TabularStore::new(rows)
}

/// CSVの1行をパース
///
/// `"` が現れるたびにクォート内モードを反転する。クォート文字自体は
/// 出力に含めない（`""` のエスケープも単に2回反転するだけ）。
/// クォートが閉じられていない場合は行末までをクォート内として扱い、
/// エラーにはしない。各フィールドは前後の空白（`\r` を含む）を除去する。
pub fn parse_csv_line(line: &str) -> Row {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());

    Row::new(cells)
}
