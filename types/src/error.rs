//! Errors raised while constructing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("invalid pool parameters: {0}")]
    InvalidParams(String),
}
