use btcstake_types::{Principal, Tick};

/// What the host attaches to every call: who is calling, and when.
///
/// The pool never reads a clock of its own; `tick` is trusted to be
/// non-decreasing across calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub tick: Tick,
}

impl CallContext {
    pub fn new(caller: Principal, tick: Tick) -> Self {
        Self { caller, tick }
    }
}
