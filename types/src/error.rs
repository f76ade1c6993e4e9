//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid hex value: {0}")]
    InvalidHex(String),

    #[error("invalid bond parameters: {0}")]
    InvalidParams(String),
}
