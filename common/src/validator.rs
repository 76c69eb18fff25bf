//! 複数回読み取りによるバーコード確定
//!
//! カメラのデコード結果は誤読を含むため、同じコードが一定回数
//! 読み取られた時点で初めて確定とする。
//!
//! - 英数字以外は除去
//! - 長さ 6〜15 以外は破棄（10桁の数字は常に受け付ける）
//! - 直近10件のうち、10桁の数字は2回・それ以外は3回で確定
//! - 2秒間新しい読み取りがなければバッファを破棄
//! - 確定したコードは3秒間再確定しない

use crate::timer::{TimerDomain, TimerSlot};
use crate::timings::ScanTimings;
use regex::Regex;
use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

lazy_static::lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^0-9A-Za-z]").unwrap();
    static ref FAST_TRACK: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// 確定済みコード
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedCode(String);

impl ValidatedCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 1回の読み取りの判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// 形式不正で破棄（エラーではない）
    Rejected,
    /// バッファに追加したが未確定
    Pending,
    /// 確定
    Accepted(ValidatedCode),
}

/// 10桁の数字か（確定回数が少なくて済む）
pub fn is_fast_track(code: &str) -> bool {
    FAST_TRACK.is_match(code)
}

/// 英数字以外を除去
pub fn clean_code(raw: &str) -> String {
    NON_ALNUM.replace_all(raw, "").into_owned()
}

/// 読み取り確定フィルタ
#[derive(Debug, Clone)]
pub struct ReadValidator {
    timings: ScanTimings,
    buffer: VecDeque<String>,
    buffer_expiry: TimerSlot,
    last_accepted: Option<String>,
    accepted_expiry: TimerSlot,
}

impl Default for ReadValidator {
    fn default() -> Self {
        Self::new(ScanTimings::default())
    }
}

impl ReadValidator {
    pub fn new(timings: ScanTimings) -> Self {
        Self {
            buffer: VecDeque::with_capacity(timings.buffer_capacity + 1),
            timings,
            buffer_expiry: TimerSlot::new(TimerDomain::BufferExpiry),
            last_accepted: None,
            accepted_expiry: TimerSlot::new(TimerDomain::AcceptedExpiry),
        }
    }

    /// 生の読み取り結果を受け取り、確定したらコードを返す
    pub fn observe(&mut self, raw: &str, now: Instant) -> Option<ValidatedCode> {
        match self.observe_detailed(raw, now) {
            Observation::Accepted(code) => Some(code),
            Observation::Rejected | Observation::Pending => None,
        }
    }

    /// `observe` の判定内訳つき版
    pub fn observe_detailed(&mut self, raw: &str, now: Instant) -> Observation {
        self.poll(now);

        let cleaned = clean_code(raw);
        let fast_track = is_fast_track(&cleaned);
        if !fast_track && !self.timings.length_bounds().contains(&cleaned.len()) {
            tracing::trace!(raw, len = cleaned.len(), "read rejected");
            return Observation::Rejected;
        }

        self.buffer.push_back(cleaned);
        while self.buffer.len() > self.timings.buffer_capacity {
            self.buffer.pop_front();
        }

        if let Some(code) = self.find_qualifying() {
            self.accept(code.clone(), now);
            return Observation::Accepted(ValidatedCode(code));
        }

        self.buffer_expiry.arm(now, self.timings.buffer_window());
        Observation::Pending
    }

    /// 期限切れのタイマーを処理
    pub fn poll(&mut self, now: Instant) {
        if self.buffer_expiry.fire(now) {
            tracing::debug!(discarded = self.buffer.len(), "read buffer expired");
            self.buffer.clear();
        }
        if self.accepted_expiry.fire(now) {
            self.last_accepted = None;
        }
    }

    /// バッファのみ破棄（直前の確定コードは保持）
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.buffer_expiry.cancel();
    }

    /// 全状態とタイマーを破棄
    pub fn stop(&mut self) {
        self.reset();
        self.last_accepted = None;
        self.accepted_expiry.cancel();
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn last_accepted(&self) -> Option<&str> {
        self.last_accepted.as_deref()
    }

    /// 次に発火するタイマーの期限
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.buffer_expiry.deadline(), self.accepted_expiry.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn threshold(&self, code: &str) -> usize {
        if is_fast_track(code) {
            self.timings.fast_track_threshold
        } else {
            self.timings.normal_threshold
        }
    }

    /// 初出順に数え、しきい値に達した最初のコードを返す
    fn find_qualifying(&self) -> Option<String> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for code in &self.buffer {
            match counts.iter_mut().find(|(c, _)| *c == code.as_str()) {
                Some((_, n)) => *n += 1,
                None => counts.push((code.as_str(), 1)),
            }
        }

        counts
            .into_iter()
            .find(|(code, n)| {
                *n >= self.threshold(code) && self.last_accepted.as_deref() != Some(*code)
            })
            .map(|(code, _)| code.to_string())
    }

    fn accept(&mut self, code: String, now: Instant) {
        tracing::debug!(code = %code, "read accepted");
        self.buffer.clear();
        self.buffer_expiry.cancel();
        self.last_accepted = Some(code);
        self.accepted_expiry
            .arm(now, self.timings.accepted_suppression());
    }
}
