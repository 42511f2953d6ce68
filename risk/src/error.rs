use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("score unit must be non-zero")]
    ZeroScoreUnit,

    #[error("arithmetic overflow in risk score")]
    Overflow,

    #[error("storage error: {0}")]
    Storage(#[from] btcstake_store::StoreError),
}
