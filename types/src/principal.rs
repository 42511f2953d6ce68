//! Caller identity used as the key of every per-account map.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identity as attributed by the host environment.
///
/// The pool never authenticates principals itself; it only compares them
/// (owner checks, sender checks) and uses them as map keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Longest accepted identity, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Parse and validate a principal.
    ///
    /// A principal must be non-empty, at most [`Principal::MAX_LEN`] bytes,
    /// and contain no whitespace.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypesError::InvalidPrincipal("empty".into()));
        }
        if s.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidPrincipal(format!(
                "{} bytes exceeds {}",
                s.len(),
                Self::MAX_LEN
            )));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidPrincipal(format!("contains whitespace: {s:?}")));
        }
        Ok(Self(s))
    }

    /// Create a principal from a string known to be valid.
    ///
    /// # Panics
    /// Panics if the string is not a valid principal. Intended for literals
    /// in tests and fixtures; use [`Principal::parse`] for external input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Principal {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl std::str::FromStr for Principal {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
