//! Block-height source for tests and the simulator.
//!
//! The pool never reads a clock of its own; each call is stamped with the
//! tick the host assigns to it. `NullClock` stands in for that host: it
//! holds the current block height and moves only when told to.

use btcstake_types::Tick;
use std::cell::Cell;

pub struct NullClock {
    height: Cell<Tick>,
}

impl NullClock {
    /// Start at block `height`.
    pub fn new(height: u64) -> Self {
        Self {
            height: Cell::new(Tick::new(height)),
        }
    }

    /// The tick the next call will be stamped with.
    pub fn now(&self) -> Tick {
        self.height.get()
    }

    /// Mine `blocks` more blocks. Saturates at `u64::MAX`.
    pub fn advance(&self, blocks: u64) {
        self.height.set(self.height.get().advance(blocks));
    }

    /// Place the chain tip at `height`, earlier or later than now.
    pub fn set(&self, height: u64) {
        self.height.set(Tick::new(height));
    }
}
