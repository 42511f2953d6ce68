//! Token metadata storage trait.

use crate::StoreError;

/// Storage for the one mutable piece of token metadata: the URI.
///
/// Name, symbol and decimals are fixed at deployment and live in
/// configuration, not in the store.
pub trait MetaStore {
    fn get_token_uri(&self) -> Result<Option<String>, StoreError>;

    /// Store a new URI, or clear it with `None`.
    fn put_token_uri(&self, uri: Option<&str>) -> Result<(), StoreError>;
}
