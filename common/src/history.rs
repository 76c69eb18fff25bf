//! スキャン履歴（見つかったコードのみ、新しい順）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 履歴1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryEntry {
    pub code: String,
    pub row_index: usize,
    pub zone: String,
    pub color: String,
    pub address: String,
    pub timestamp: DateTime<Utc>,
}

/// 件数上限つき履歴
#[derive(Debug, Clone)]
pub struct ScanHistory {
    entries: VecDeque<ScanHistoryEntry>,
    capacity: usize,
}

impl ScanHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// 先頭に追加し、上限を超えた古いものを捨てる
    pub fn push(&mut self, entry: ScanHistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// 新しい順
    pub fn iter(&self) -> impl Iterator<Item = &ScanHistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ScanHistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
