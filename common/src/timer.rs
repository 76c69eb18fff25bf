//! 取り消し可能なタイマースロット
//!
//! 状態機械は時刻を引数 (`now`) で受け取り、期限切れのスロットを
//! 自分で発火させる。同じドメインで再度 `arm` すると前の期限は上書きされる。

use std::time::{Duration, Instant};

/// タイマーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerDomain {
    /// 読み取りバッファの無操作タイムアウト
    BufferExpiry,
    /// 直前に確定したコードの再確定抑止
    AcceptedExpiry,
    /// 結果表示中のスキャン抑止
    ResultSuppression,
}

/// 1ドメイン分のタイマー
#[derive(Debug, Clone)]
pub struct TimerSlot {
    domain: TimerDomain,
    deadline: Option<Instant>,
}

impl TimerSlot {
    pub fn new(domain: TimerDomain) -> Self {
        Self {
            domain,
            deadline: None,
        }
    }

    pub fn domain(&self) -> TimerDomain {
        self.domain
    }

    /// `now + after` に期限を設定（既存の期限は取り消し）
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 期限に達していれば解除して true を返す（1回だけ発火）
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                tracing::trace!(domain = ?self.domain, "timer fired");
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_once_at_deadline() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new(TimerDomain::BufferExpiry);
        slot.arm(t0, Duration::from_secs(2));

        assert!(!slot.fire(t0 + Duration::from_millis(1999)));
        assert!(slot.fire(t0 + Duration::from_secs(2)));
        assert!(!slot.fire(t0 + Duration::from_secs(5)));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_rearm_supersedes() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new(TimerDomain::ResultSuppression);
        slot.arm(t0, Duration::from_secs(2));
        slot.arm(t0 + Duration::from_secs(1), Duration::from_secs(2));

        assert!(!slot.fire(t0 + Duration::from_millis(2500)));
        assert!(slot.fire(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new(TimerDomain::AcceptedExpiry);
        slot.arm(t0, Duration::from_secs(1));
        slot.cancel();
        assert!(!slot.fire(t0 + Duration::from_secs(10)));
        assert_eq!(slot.domain(), TimerDomain::AcceptedExpiry);
    }
}
