//! Logical clock type supplied by the host environment.
//!
//! A tick is one unit of confirmed host progress (a block height, say).
//! Ticks only ever move forward; the pool never reads wall-clock time.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(u64);

impl Tick {
    /// The first tick.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Ticks elapsed from `self` to `now`; zero if `now` is not later.
    pub fn elapsed_since(&self, now: Tick) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether at least `period` ticks have passed since `self`.
    pub fn has_elapsed(&self, period: u64, now: Tick) -> bool {
        self.elapsed_since(now) >= period
    }

    /// The tick `n` steps after this one, saturating at `u64::MAX`.
    pub fn advance(&self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Tick {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_when_now_is_earlier() {
        assert_eq!(Tick::new(100).elapsed_since(Tick::new(50)), 0);
        assert_eq!(Tick::new(50).elapsed_since(Tick::new(194)), 144);
    }

    #[test]
    fn has_elapsed_is_inclusive() {
        let start = Tick::new(10);
        assert!(!start.has_elapsed(144, Tick::new(153)));
        assert!(start.has_elapsed(144, Tick::new(154)));
    }

    #[test]
    fn advance_saturates() {
        assert_eq!(Tick::new(u64::MAX - 1).advance(5), Tick::new(u64::MAX));
    }
}
