//! Injected time source.
//!
//! The book never reads ambient time. Embedders hand it a [`Clock`] at
//! construction; every order and trade timestamp flows from that one
//! source, which keeps replays and tests deterministic.

use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond clock. Implementations must be monotonically non-decreasing.
pub trait Clock: Send {
    fn now_millis(&mut self) -> i64;
}

/// Wall-clock time with a monotonicity clamp.
///
/// `SystemTime` can step backwards under NTP adjustment; the clamp pins
/// reported time to the latest value seen.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: i64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_millis(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_millis() as i64;
        self.last = self.last.max(now);
        self.last
    }
}

/// Manually advanced clock for tests and deterministic replay.
#[derive(Debug)]
pub struct ManualClock {
    now: i64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self { now: start }
    }

    pub fn advance(&mut self, millis: i64) {
        assert!(millis >= 0, "manual clock cannot move backwards");
        self.now += millis;
    }
}

impl Clock for ManualClock {
    fn now_millis(&mut self) -> i64 {
        self.now
    }
}
