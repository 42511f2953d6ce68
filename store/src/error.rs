use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage lock poisoned: {0}")]
    LockPoisoned(String),
}
