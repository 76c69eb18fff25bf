//! バーコード照合モジュール
//!
//! 確定したコードをシートの行に照合し、ゾーンと住所を返す。
//!
//! ## 照合ルール（いずれか1つで一致）
//! 1. 完全一致
//! 2. セル側のコードが入力を含む
//! 3. 入力がセル側のコードを含む（セル側が4文字以上のときのみ）
//! 4. 先頭の整数として読んだ値が等しい（`007` と `7`）
//!
//! 最良一致は探さない。行順 → 列マップ順 → カンマ区切り順で
//! 最初に一致したものを採用する。

use crate::layout::{ZoneColumn, ZoneColumnMap};
use crate::store::TabularStore;
use serde::{Deserialize, Serialize};

/// 住所セルが空の場合の表示
pub const ADDRESS_PLACEHOLDER: &str = "Dirección no disponible";

/// ルール3の最小長（これ以下の短いコードは部分一致させない）
const MIN_CONTAINED_LEN: usize = 3;

/// 照合結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MatchResult {
    #[serde(rename_all = "camelCase")]
    Found {
        /// 0始まりの行番号（ヘッダー行も数える。表示位置としてそのまま使う）
        row_index: usize,
        /// 一致したバーコード列
        code_column: usize,
        zone: String,
        color: String,
        address: String,
    },
    NotFound,
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }
}

/// どのルールで一致したか（ログ用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Exact,
    CellContainsCode,
    CodeContainsCell,
    Numeric,
}

/// コードをシートに照合
///
/// 純粋関数。同じ入力には常に同じ結果を返す。
///
/// # Arguments
/// * `code` - スキャンまたは手入力されたコード
/// * `columns` - ゾーン列マップ
/// * `store` - シートデータ（0行目も検索対象）
pub fn match_code(code: &str, columns: &ZoneColumnMap, store: &TabularStore) -> MatchResult {
    let needle = code.trim().to_lowercase();

    for (row_index, row) in store.rows().iter().enumerate() {
        for zone in columns.columns() {
            let Some(cell) = row.get(zone.code_column) else {
                continue;
            };
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }

            let cell = cell.to_lowercase();
            let hit = cell
                .split(',')
                .map(str::trim)
                .find_map(|candidate| match_rule(&needle, candidate));

            if let Some(rule) = hit {
                tracing::debug!(
                    code = %needle,
                    row = row_index,
                    column = zone.code_column,
                    ?rule,
                    "matched"
                );
                return found(row_index, zone, row.get(zone.address_column));
            }
        }
    }

    tracing::debug!(code = %needle, rows = store.len(), "no match");
    MatchResult::NotFound
}

/// 1つのコード候補に対してルールを順に評価
pub fn match_rule(needle: &str, candidate: &str) -> Option<MatchRule> {
    if candidate == needle {
        return Some(MatchRule::Exact);
    }
    if candidate.contains(needle) {
        return Some(MatchRule::CellContainsCode);
    }
    if needle.contains(candidate) && candidate.chars().count() > MIN_CONTAINED_LEN {
        return Some(MatchRule::CodeContainsCell);
    }
    match (leading_integer(needle), leading_integer(candidate)) {
        (Some(a), Some(b)) if a == b => Some(MatchRule::Numeric),
        _ => None,
    }
}

fn found(row_index: usize, zone: &ZoneColumn, address: Option<&str>) -> MatchResult {
    let address = address
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(ADDRESS_PLACEHOLDER);

    MatchResult::Found {
        row_index,
        code_column: zone.code_column,
        zone: zone.zone.clone(),
        color: zone.color.clone(),
        address: address.to_string(),
    }
}

/// 先頭の整数部分を正規化した文字列で返す
///
/// 先頭の空白と符号を許し、数字が続く限り読む。以降の文字は無視する。
/// 数字が1つもなければ None。桁数の制限はなく、先頭のゼロを除いた
/// 10進表記（ゼロは符号なしの "0"）で比較する。
///
/// ```
/// use warehouse_scan_common::matcher::leading_integer;
///
/// assert_eq!(leading_integer("007"), Some("7".to_string()));
/// assert_eq!(leading_integer(" -12abc"), Some("-12".to_string()));
/// assert_eq!(leading_integer("abc"), None);
/// ```
pub fn leading_integer(text: &str) -> Option<String> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.trim_start_matches('0');
    if magnitude.is_empty() {
        return Some("0".to_string());
    }
    Some(if negative {
        format!("-{}", magnitude)
    } else {
        magnitude.to_string()
    })
}
