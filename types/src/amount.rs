//! Amount representation.
//!
//! Every ledger figure is an unsigned integer count of the smallest unit
//! (satoshis for the staked asset). There is no floating point anywhere in
//! the pool; rates are expressed in basis points.

/// A non-negative ledger quantity in base units.
pub type Amount = u128;

/// Base units per whole bitcoin.
pub const SATS_PER_BTC: Amount = 100_000_000;

/// Basis-point denominator (100% = 10_000 bps).
pub const BASIS_POINTS: Amount = 10_000;

/// Serde adapter for [`Amount`] fields in formats without 128-bit integers.
///
/// TOML integers are `i64`. Values in that range are written as plain
/// integers; anything larger is written as a decimal string. Both shapes
/// are accepted on read.
///
/// ```ignore
/// #[serde(with = "btcstake_types::amount::serde_int")]
/// pub minimum_stake: Amount,
/// ```
pub mod serde_int {
    use super::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        match i64::try_from(*value) {
            Ok(small) => serializer.serialize_i64(small),
            Err(_) => serializer.serialize_str(&value.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::custom(format!("negative amount: {v}")))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid amount: {v:?}")))
        }
    }
}
