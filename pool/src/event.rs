//! Events emitted by successful pool calls, and the bus that fans them out.

use btcstake_types::amount::serde_int;
use btcstake_types::{Amount, Principal, Tick};
use serde::{Deserialize, Serialize};

/// One event per successful mutating call.
///
/// Serialized with a `kind` tag (`"stake"`, `"yield-distributed"`, ...) so the
/// JSON form is self-describing for indexers. Amounts that do not fit an
/// `i64` are written as decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PoolEvent {
    /// The pool left the uninitialized state.
    PoolInitialized {
        owner: Principal,
        #[serde(with = "serde_int")]
        yield_rate: Amount,
        tick: Tick,
    },
    Stake {
        staker: Principal,
        #[serde(with = "serde_int")]
        amount: Amount,
        #[serde(with = "serde_int")]
        balance: Amount,
        #[serde(with = "serde_int")]
        total_staked: Amount,
        #[serde(with = "serde_int")]
        risk_score: Amount,
    },
    /// A withdrawal, including whatever rewards were claimed on the way out.
    Unstake {
        staker: Principal,
        #[serde(with = "serde_int")]
        amount: Amount,
        #[serde(with = "serde_int")]
        rewards_claimed: Amount,
        #[serde(with = "serde_int")]
        balance: Amount,
        #[serde(with = "serde_int")]
        total_staked: Amount,
    },
    YieldDistributed {
        tick: Tick,
        #[serde(with = "serde_int")]
        amount: Amount,
        #[serde(with = "serde_int")]
        apy: Amount,
        elapsed: u64,
        #[serde(with = "serde_int")]
        total_yield: Amount,
        #[serde(with = "serde_int")]
        total_staked: Amount,
    },
    RewardsClaimed {
        staker: Principal,
        #[serde(with = "serde_int")]
        amount: Amount,
        #[serde(with = "serde_int")]
        balance: Amount,
        #[serde(with = "serde_int")]
        total_staked: Amount,
    },
    Transfer {
        sender: Principal,
        recipient: Principal,
        #[serde(with = "serde_int")]
        amount: Amount,
        #[serde(with = "serde_int")]
        sender_balance: Amount,
        #[serde(with = "serde_int")]
        recipient_balance: Amount,
        #[serde(default, with = "memo_hex", skip_serializing_if = "Option::is_none")]
        memo: Option<Vec<u8>>,
    },
    TokenUriUpdated {
        uri: Option<String>,
    },
    InsuranceUpdated {
        enabled: bool,
    },
}

impl PoolEvent {
    /// The event's wire name, as used in the `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            PoolEvent::PoolInitialized { .. } => "pool-initialized",
            PoolEvent::Stake { .. } => "stake",
            PoolEvent::Unstake { .. } => "unstake",
            PoolEvent::YieldDistributed { .. } => "yield-distributed",
            PoolEvent::RewardsClaimed { .. } => "rewards-claimed",
            PoolEvent::Transfer { .. } => "transfer",
            PoolEvent::TokenUriUpdated { .. } => "token-uri-updated",
            PoolEvent::InsuranceUpdated { .. } => "insurance-updated",
        }
    }
}

/// Memo bytes travel as a hex string.
mod memo_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(memo: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match memo {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

type Listener = Box<dyn Fn(&PoolEvent) + Send + Sync>;

/// Synchronous fan-out bus for pool events.
///
/// Listeners run inline on the calling thread after the call has committed;
/// a slow listener delays the return of the call that emitted.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &PoolEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn alice() -> Principal {
        Principal::new("alice")
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&PoolEvent::InsuranceUpdated { enabled: true });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::default();
        bus.emit(&PoolEvent::TokenUriUpdated { uri: None });
    }

    #[test]
    fn json_carries_kebab_case_kind() {
        let event = PoolEvent::RewardsClaimed {
            staker: alice(),
            amount: 5_000_000,
            balance: 105_000_000,
            total_staked: 105_000_000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "rewards-claimed");
        assert_eq!(json["staker"], "alice");
        assert_eq!(event.kind(), "rewards-claimed");
    }

    #[test]
    fn transfer_memo_is_hex_on_the_wire() {
        let event = PoolEvent::Transfer {
            sender: alice(),
            recipient: Principal::new("bob"),
            amount: 1,
            sender_balance: 0,
            recipient_balance: 1,
            memo: Some(b"gm".to_vec()),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""memo":"676d""#));
        let back: PoolEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn stake_reads_back_from_json() {
        let event = PoolEvent::Stake {
            staker: alice(),
            amount: 100_000_000,
            balance: 100_000_000,
            total_staked: 100_000_000,
            risk_score: 100,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""amount":100000000"#));
        let back: PoolEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn oversized_amounts_travel_as_strings() {
        let huge = u128::MAX / 1_000;
        let event = PoolEvent::RewardsClaimed {
            staker: alice(),
            amount: 1,
            balance: huge,
            total_staked: huge,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["amount"], 1);
        assert_eq!(value["balance"], huge.to_string());
        let back: PoolEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn transfer_without_memo_omits_field() {
        let event = PoolEvent::Transfer {
            sender: alice(),
            recipient: Principal::new("bob"),
            amount: 1,
            sender_balance: 0,
            recipient_balance: 1,
            memo: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("memo").is_none());
    }
}
