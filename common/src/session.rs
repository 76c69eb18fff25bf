//! 照会セッション
//!
//! カメラの読み取り結果を確定フィルタに通し、確定したコードをシートに
//! 照合する。結果を出すたびに一定時間スキャンを止め、同じ結果が
//! 連続して出ないようにする。手入力はフィルタも停止も通らない。
//!
//! セッションは開始から `stop` までの間だけ状態を持ち、
//! 判定に使う時刻はすべて呼び出し側から `now` として渡す。
//! 履歴の表示用タイムスタンプだけは解決時の実時刻（UTC）を記録する。

use crate::history::{ScanHistory, ScanHistoryEntry};
use crate::layout::ZoneColumnMap;
use crate::matcher::{match_code, MatchResult};
use crate::store::TabularStore;
use crate::timer::{TimerDomain, TimerSlot};
use crate::timings::ScanTimings;
use crate::validator::ReadValidator;
use std::sync::Arc;
use std::time::Instant;

/// 振動などで返すフィードバックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// 見つかった（短・短・長）
    Success,
    /// 見つからなかった（長・短・長）
    Failure,
}

impl Feedback {
    /// 振動パターン（ON/OFFを交互に並べたミリ秒）
    pub fn vibration_pattern(&self) -> &'static [u32] {
        match self {
            Feedback::Success => &[100, 50, 100, 50, 200],
            Feedback::Failure => &[200, 100, 200],
        }
    }
}

/// 照会のきっかけ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Scan,
    Manual,
}

/// 照会1回分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEvent {
    pub code: String,
    pub trigger: Trigger,
    pub result: MatchResult,
    pub feedback: Feedback,
}

/// 照会セッション
#[derive(Debug)]
pub struct LookupSession {
    store: Arc<TabularStore>,
    columns: ZoneColumnMap,
    timings: ScanTimings,
    validator: ReadValidator,
    history: ScanHistory,
    /// 期限が設定されている間は結果表示中
    result_timer: TimerSlot,
}

impl LookupSession {
    pub fn new(store: Arc<TabularStore>, columns: ZoneColumnMap, timings: ScanTimings) -> Self {
        Self {
            store,
            columns,
            validator: ReadValidator::new(timings.clone()),
            history: ScanHistory::new(timings.history_capacity),
            timings,
            result_timer: TimerSlot::new(TimerDomain::ResultSuppression),
        }
    }

    /// シートを差し替える（照会中のものは古いシートを最後まで使う）
    pub fn replace_store(&mut self, store: Arc<TabularStore>) {
        tracing::info!(rows = store.len(), "sheet replaced");
        self.store = store;
    }

    pub fn store(&self) -> &Arc<TabularStore> {
        &self.store
    }

    pub fn columns(&self) -> &ZoneColumnMap {
        &self.columns
    }

    /// カメラからの読み取り結果
    ///
    /// 結果表示中は確定フィルタにも渡さず捨てる。
    pub fn on_detected_frame(&mut self, raw: &str, now: Instant) -> Option<LookupEvent> {
        self.poll(now);

        if self.is_showing_result() {
            return None;
        }

        let code = self.validator.observe(raw, now)?;
        Some(self.resolve(code.into_inner(), Trigger::Scan, now))
    }

    /// 手入力のコードを照会（空入力は無視）
    pub fn submit(&mut self, code: &str, now: Instant) -> Option<LookupEvent> {
        self.poll(now);

        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        Some(self.resolve(code.to_string(), Trigger::Manual, now))
    }

    /// 期限切れのタイマーを処理。結果表示が終わった時に true
    pub fn poll(&mut self, now: Instant) -> bool {
        self.validator.poll(now);

        self.result_timer.fire(now)
    }

    pub fn is_showing_result(&self) -> bool {
        self.result_timer.is_armed()
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    pub fn validator(&self) -> &ReadValidator {
        &self.validator
    }

    /// 次に発火するタイマーの期限
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.validator.next_deadline(), self.result_timer.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// 全タイマーを取り消して一時状態を破棄（履歴は残す）
    pub fn stop(&mut self) {
        self.validator.stop();
        self.result_timer.cancel();
    }

    fn resolve(&mut self, code: String, trigger: Trigger, now: Instant) -> LookupEvent {
        let result = match_code(&code, &self.columns, &self.store);

        let feedback = match &result {
            MatchResult::Found {
                row_index,
                zone,
                color,
                address,
                ..
            } => {
                self.history.push(ScanHistoryEntry {
                    code: code.clone(),
                    row_index: *row_index,
                    zone: zone.clone(),
                    color: color.clone(),
                    address: address.clone(),
                    timestamp: chrono::Utc::now(),
                });
                Feedback::Success
            }
            MatchResult::NotFound => Feedback::Failure,
        };

        self.result_timer.arm(now, self.timings.result_display());

        tracing::info!(code = %code, ?trigger, found = result.is_found(), "lookup resolved");

        LookupEvent {
            code,
            trigger,
            result,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Row;
    use std::time::Duration;

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    fn session() -> LookupSession {
        session_with(ScanTimings::default())
    }

    fn session_with(timings: ScanTimings) -> LookupSession {
        let mut cells = vec![String::new(); 14];
        cells[8] = "Carrer Major 1".into();
        cells[9] = "1234567890".into();
        let header = Row::from(vec!["h"; 14]);
        let store = TabularStore::new(vec![header, Row::new(cells)]);
        LookupSession::new(Arc::new(store), ZoneColumnMap::three_zone(), timings)
    }

    #[test]
    fn test_scan_resolves_found() {
        let t0 = Instant::now();
        let mut s = session();
        assert!(s.on_detected_frame("1234567890", t0).is_none());
        let event = s.on_detected_frame("1234567890", ms(t0, 100)).unwrap();

        assert_eq!(event.trigger, Trigger::Scan);
        assert_eq!(event.feedback, Feedback::Success);
        assert!(event.result.is_found());
        assert_eq!(s.history().len(), 1);
        assert!(s.is_showing_result());
    }

    #[test]
    fn test_frames_dropped_while_showing_result() {
        let t0 = Instant::now();
        let mut s = session();
        s.on_detected_frame("1234567890", t0);
        s.on_detected_frame("1234567890", ms(t0, 100));

        // 表示中の読み取りはフィルタに届かない
        for i in 0..5 {
            assert!(s.on_detected_frame("ZZZ99999", ms(t0, 200 + i * 10)).is_none());
        }
        assert_eq!(s.validator().buffer_len(), 0);
    }

    #[test]
    fn test_suppression_clears_after_display_time() {
        let t0 = Instant::now();
        let mut s = session();
        s.on_detected_frame("1234567890", t0);
        s.on_detected_frame("1234567890", ms(t0, 100));

        assert!(!s.poll(ms(t0, 3000)));
        assert!(s.poll(ms(t0, 3100)));
        assert!(!s.is_showing_result());
    }

    #[test]
    fn test_not_found_sets_suppression_without_history() {
        let t0 = Instant::now();
        let mut s = session();
        s.on_detected_frame("NOPE0001", t0);
        s.on_detected_frame("NOPE0001", ms(t0, 10));
        let event = s.on_detected_frame("NOPE0001", ms(t0, 20)).unwrap();

        assert_eq!(event.result, MatchResult::NotFound);
        assert_eq!(event.feedback, Feedback::Failure);
        assert!(s.history().is_empty());
        assert!(s.is_showing_result());
    }

    #[test]
    fn test_same_code_not_retriggered_within_window() {
        let t0 = Instant::now();
        let timings = ScanTimings {
            result_display_ms: 1000,
            ..Default::default()
        };
        let mut s = session_with(timings);
        s.on_detected_frame("1234567890", t0);
        assert!(s.on_detected_frame("1234567890", ms(t0, 100)).is_some());

        // 表示が終わっても、確定から3秒以内は同じコードで再照会しない
        assert!(s.on_detected_frame("1234567890", ms(t0, 1200)).is_none());
        assert!(s.on_detected_frame("1234567890", ms(t0, 1300)).is_none());
        assert!(!s.is_showing_result());

        let event = s.on_detected_frame("1234567890", ms(t0, 3200));
        assert!(event.is_some());
    }

    #[test]
    fn test_manual_submit_bypasses_suppression() {
        let t0 = Instant::now();
        let mut s = session();
        s.on_detected_frame("1234567890", t0);
        s.on_detected_frame("1234567890", ms(t0, 100));
        assert!(s.is_showing_result());

        let event = s.submit("  1234567890 ", ms(t0, 200)).unwrap();
        assert_eq!(event.trigger, Trigger::Manual);
        assert_eq!(event.code, "1234567890");
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_blank_manual_submit_is_ignored() {
        let mut s = session();
        assert!(s.submit("   ", Instant::now()).is_none());
        assert!(!s.is_showing_result());
    }

    #[test]
    fn test_stop_cancels_timers() {
        let t0 = Instant::now();
        let mut s = session();
        s.on_detected_frame("1234567890", t0);
        s.on_detected_frame("1234567890", ms(t0, 100));
        s.stop();

        assert!(!s.is_showing_result());
        assert_eq!(s.next_deadline(), None);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_replace_store() {
        let t0 = Instant::now();
        let mut s = session();
        s.replace_store(Arc::new(TabularStore::default()));
        let event = s.submit("1234567890", t0).unwrap();
        assert_eq!(event.result, MatchResult::NotFound);
    }

    #[test]
    fn test_history_timestamp_is_wall_clock_at_resolution() {
        let mut s = session();
        let before = chrono::Utc::now();
        // 判定用の now とは無関係に、解決時の実時刻が入る
        s.submit("1234567890", Instant::now() + Duration::from_secs(3600));
        let after = chrono::Utc::now();

        let stamp = s.history().latest().unwrap().timestamp;
        assert!(before <= stamp && stamp <= after);
    }

    #[test]
    fn test_feedback_patterns_differ() {
        assert_ne!(
            Feedback::Success.vibration_pattern(),
            Feedback::Failure.vibration_pattern()
        );
    }
}
