//! スキャン判定のパラメータ

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// 読み取り確定・結果表示のしきい値と待ち時間
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanTimings {
    /// 無操作でバッファを破棄するまでの時間 (ms)
    pub buffer_window_ms: u64,
    /// 確定したコードを再確定させない時間 (ms)
    pub accepted_suppression_ms: u64,
    /// 結果表示中にスキャンを止める時間 (ms)
    pub result_display_ms: u64,
    /// バッファに保持する読み取り数
    pub buffer_capacity: usize,
    /// 履歴の最大件数
    pub history_capacity: usize,
    /// 10桁数字コードの確定回数
    pub fast_track_threshold: usize,
    /// 通常コードの確定回数
    pub normal_threshold: usize,
    /// 通常コードの最小長
    pub min_length: usize,
    /// 通常コードの最大長
    pub max_length: usize,
}

impl Default for ScanTimings {
    fn default() -> Self {
        Self {
            buffer_window_ms: 2000,
            accepted_suppression_ms: 3000,
            result_display_ms: 3000,
            buffer_capacity: 10,
            history_capacity: 10,
            fast_track_threshold: 2,
            normal_threshold: 3,
            min_length: 6,
            max_length: 15,
        }
    }
}

impl ScanTimings {
    pub fn buffer_window(&self) -> Duration {
        Duration::from_millis(self.buffer_window_ms)
    }

    pub fn accepted_suppression(&self) -> Duration {
        Duration::from_millis(self.accepted_suppression_ms)
    }

    pub fn result_display(&self) -> Duration {
        Duration::from_millis(self.result_display_ms)
    }

    pub fn length_bounds(&self) -> RangeInclusive<usize> {
        self.min_length..=self.max_length
    }
}
