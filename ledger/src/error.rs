use btcstake_types::Amount;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("sender and recipient are the same account")]
    SelfTransfer,

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("arithmetic overflow in ledger update")]
    Overflow,

    #[error("storage error: {0}")]
    Storage(#[from] btcstake_store::StoreError),
}
